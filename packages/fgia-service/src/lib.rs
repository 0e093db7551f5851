pub mod prompts;
pub mod respond;

mod error;

pub use error::{Error, Result};
pub use respond::{ChatRequest, LatencyClass, ResponsePayload, ResponseSource};

use std::{future::Future, pin::Pin, sync::Arc};

use fgia_domain::KnowledgeBase;
use fgia_providers::{CompletionClient, CompletionRequest};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		request: &'a CompletionRequest,
	) -> BoxFuture<'a, fgia_providers::Result<String>>;
}

impl CompletionProvider for CompletionClient {
	fn complete<'a>(
		&'a self,
		request: &'a CompletionRequest,
	) -> BoxFuture<'a, fgia_providers::Result<String>> {
		Box::pin(CompletionClient::complete(self, request))
	}
}

/// Hybrid responder over an immutable knowledge table and one completion provider.
pub struct Assistant {
	pub(crate) knowledge: KnowledgeBase,
	pub(crate) completion: Arc<dyn CompletionProvider>,
}
impl Assistant {
	pub fn new(completion: Arc<dyn CompletionProvider>) -> Self {
		Self { knowledge: KnowledgeBase::builtin(), completion }
	}

	pub fn with_knowledge(knowledge: KnowledgeBase, completion: Arc<dyn CompletionProvider>) -> Self {
		Self { knowledge, completion }
	}

	pub fn knowledge(&self) -> &KnowledgeBase {
		&self.knowledge
	}
}
