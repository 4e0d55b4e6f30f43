//! Method registry and the handlers it dispatches to
//!
//! The registry is built once at startup and shared read-only across requests.

pub mod echo;

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;

use crate::{errors::RpcError, rpc::envelope::Params};

#[async_trait]
pub trait RpcMethod: Send + Sync {
    fn name(&self) -> &'static str;

    async fn call(&self, params: Params) -> Result<Value, RpcError>;
}

#[derive(Clone, Default)]
pub struct MethodRegistry {
    methods: BTreeMap<&'static str, Arc<dyn RpcMethod>>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry served by the binary: `echo` only.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(echo::Echo));
        registry
    }

    pub fn register(&mut self, method: Arc<dyn RpcMethod>) {
        self.methods.insert(method.name(), method);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn RpcMethod>> {
        self.methods.get(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.methods.keys().copied().collect()
    }

    pub async fn dispatch(&self, name: &str, params: Params) -> Result<Value, RpcError> {
        let method = self
            .get(name)
            .ok_or_else(|| RpcError::MethodNotFound(name.to_string()))?;
        method.call(params).await
    }
}
