//! Recording toolkit double for executor and orchestrator tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{ContractHandle, Estimate, LimitedOperation, MichelsonArg, Operation, Parameter, Toolkit, TransferParams};
use crate::shared::errors::ToolkitError;

pub struct FakeContract {
    address: String,
    entrypoints: Vec<String>,
}

impl FakeContract {
    pub fn new(address: &str, entrypoints: &[&str]) -> Self {
        Self {
            address: address.to_string(),
            entrypoints: entrypoints.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl ContractHandle for FakeContract {
    fn address(&self) -> &str {
        &self.address
    }

    fn has_entrypoint(&self, entrypoint: &str) -> bool {
        self.entrypoints.iter().any(|e| e == entrypoint)
    }

    fn transfer_params(&self, entrypoint: &str, args: &[MichelsonArg]) -> Result<TransferParams, ToolkitError> {
        Ok(TransferParams {
            to: self.address.clone(),
            amount: 0,
            parameter: Some(Parameter {
                entrypoint: entrypoint.to_string(),
                value: serde_json::to_value(args).map_err(|e| ToolkitError::new(e.to_string()))?,
            }),
        })
    }
}

pub struct FakeToolkit {
    pub pkh: String,
    contracts: HashMap<String, Arc<dyn ContractHandle>>,
    estimate: Result<Vec<Estimate>, String>,
    estimate_delay: Option<Duration>,
    send_result: Result<String, String>,
    pub estimated: Mutex<Vec<Vec<Operation>>>,
    pub sent: Mutex<Vec<Vec<LimitedOperation>>>,
}

impl FakeToolkit {
    pub fn new(pkh: &str) -> Self {
        Self {
            pkh: pkh.to_string(),
            contracts: HashMap::new(),
            estimate: Ok(vec![
                Estimate { gas_limit: 1_800, storage_limit: 67 },
                Estimate { gas_limit: 9_300, storage_limit: 180 },
            ]),
            estimate_delay: None,
            send_result: Ok("ooHashOfTheBatch".to_string()),
            estimated: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn with_contract(mut self, address: &str, entrypoints: &[&str]) -> Self {
        self.contracts
            .insert(address.to_string(), Arc::new(FakeContract::new(address, entrypoints)));
        self
    }

    pub fn with_estimate(mut self, estimate: Result<Vec<Estimate>, String>) -> Self {
        self.estimate = estimate;
        self
    }

    pub fn with_estimate_delay(mut self, delay: Duration) -> Self {
        self.estimate_delay = Some(delay);
        self
    }

    pub fn with_send_result(mut self, result: Result<String, String>) -> Self {
        self.send_result = result;
        self
    }

    pub fn sent_batches(&self) -> Vec<Vec<LimitedOperation>> {
        self.sent.lock().unwrap().clone()
    }

    pub fn estimated_batches(&self) -> Vec<Vec<Operation>> {
        self.estimated.lock().unwrap().clone()
    }
}

#[async_trait]
impl Toolkit for FakeToolkit {
    async fn public_key_hash(&self) -> Result<String, ToolkitError> {
        Ok(self.pkh.clone())
    }

    async fn contract_at(&self, address: &str) -> Result<Option<Arc<dyn ContractHandle>>, ToolkitError> {
        Ok(self.contracts.get(address).cloned())
    }

    async fn estimate_batch(&self, ops: &[Operation]) -> Result<Vec<Estimate>, ToolkitError> {
        if let Some(delay) = self.estimate_delay {
            tokio::time::sleep(delay).await;
        }
        self.estimated.lock().unwrap().push(ops.to_vec());
        self.estimate.clone().map_err(ToolkitError::new)
    }

    async fn send_batch(&self, ops: &[LimitedOperation]) -> Result<String, ToolkitError> {
        self.sent.lock().unwrap().push(ops.to_vec());
        self.send_result.clone().map_err(ToolkitError::new)
    }
}

/// Nat argument `index` of the operation's encoded parameter
pub fn nat_arg(op: &Operation, index: usize) -> u128 {
    let value = &op.params.parameter.as_ref().unwrap().value;
    value[index]["value"].as_str().unwrap().parse().unwrap()
}
