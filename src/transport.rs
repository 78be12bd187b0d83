//! Runtime call contract of generated endpoint functions.
//!
//! A generated function does nothing but hand `(service, operation,
//! parameter bag)` to the transport client. [`EndpointStub`] performs the
//! same step from Rust, which keeps the bag-building rules testable and
//! lets tools call a backend described by a schema document directly.

use std::sync::Mutex;

use serde_json::{Map, Value};
use tracing::debug;

use crate::spec::{OperationDef, ServiceDef};

/// Client that carries a call to the backend.
pub trait Transport: Send + Sync {
    fn call(&self, service: &str, operation: &str, params: Map<String, Value>)
        -> anyhow::Result<Value>;
}

/// Callable view of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointStub {
    pub service: String,
    pub operation: String,
    /// Bag keys in call order
    pub parameters: Vec<String>,
}

impl EndpointStub {
    pub fn new(service: &ServiceDef, operation: &OperationDef) -> Self {
        Self {
            service: service.name.clone(),
            operation: operation.name.clone(),
            parameters: operation.parameters.iter().map(|p| p.name.clone()).collect(),
        }
    }

    /// Stubs for every operation of a service.
    pub fn for_service(service: &ServiceDef) -> Vec<Self> {
        service
            .operations
            .iter()
            .map(|operation| Self::new(service, operation))
            .collect()
    }

    /// Parameter bag for positional arguments.
    ///
    /// Missing trailing arguments are left out of the bag, like `undefined`
    /// properties in a serialized object.
    pub fn bag(&self, args: &[Value]) -> anyhow::Result<Map<String, Value>> {
        if args.len() > self.parameters.len() {
            anyhow::bail!(
                "{}.{} takes {} argument(s), got {}",
                self.service,
                self.operation,
                self.parameters.len(),
                args.len()
            );
        }
        Ok(self
            .parameters
            .iter()
            .zip(args)
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect())
    }

    /// Make exactly one transport call.
    pub fn invoke(&self, transport: &dyn Transport, args: &[Value]) -> anyhow::Result<Value> {
        let bag = self.bag(args)?;
        debug!(
            service = %self.service,
            operation = %self.operation,
            params = bag.len(),
            "Invoking endpoint"
        );
        transport.call(&self.service, &self.operation, bag)
    }
}

/// One call seen by a [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub service: String,
    pub operation: String,
    pub params: Map<String, Value>,
}

/// Transport that records calls and answers with a fixed value.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    response: Value,
}

impl RecordingTransport {
    pub fn new(response: Value) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response,
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Transport for RecordingTransport {
    fn call(
        &self,
        service: &str,
        operation: &str,
        params: Map<String, Value>,
    ) -> anyhow::Result<Value> {
        let call = RecordedCall {
            service: service.to_string(),
            operation: operation.to_string(),
            params,
        };
        match self.calls.lock() {
            Ok(mut calls) => calls.push(call),
            Err(poisoned) => poisoned.into_inner().push(call),
        }
        Ok(self.response.clone())
    }
}
