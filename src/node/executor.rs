//! # Execution Loop
//!
//! Processes input records strictly in order, one backend call in flight at
//! a time:
//!
//! ```text
//! resolve parameters -> dispatch -> backend call -> emit row(s)
//!                                 \-> (failure) -> {error} row | abort run
//! ```
//!
//! There is no retry. Each record reaches the backend at most once.

use tracing::Instrument;
use uuid::Uuid;

use super::context::NodeContext;
use super::errors::{NodeError, NodeResult};
use super::request::{Operation, OperationRequest};
use super::result::{OperationResult, ResultAggregator};
use crate::client::{Document, DocumentBackend, IdGenerator};

/// Runs document operations for every input record of a run
pub struct DocumentExecutor<'a, B: DocumentBackend + ?Sized> {
    backend: &'a B,
    database_id: String,
    ids: IdGenerator,
}

impl<'a, B: DocumentBackend + ?Sized> DocumentExecutor<'a, B> {
    /// `backend` is shared read-only for the whole run
    pub fn new(backend: &'a B, database_id: impl Into<String>) -> Self {
        Self {
            backend,
            database_id: database_id.into(),
            ids: IdGenerator::new(),
        }
    }

    /// Execute every record and return the flattened output rows.
    ///
    /// Under continue-on-fail a failing record becomes an `{error}` row;
    /// otherwise the first failure aborts the run and is returned unchanged.
    pub async fn run<C: NodeContext + ?Sized>(&mut self, ctx: &C) -> NodeResult<Vec<Document>> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("run", %run_id, items = ctx.item_count());
        self.run_items(ctx).instrument(span).await
    }

    async fn run_items<C: NodeContext + ?Sized>(&mut self, ctx: &C) -> NodeResult<Vec<Document>> {
        let mut output = ResultAggregator::new();
        let mut failed = 0usize;

        for item_index in 0..ctx.item_count() {
            match self.execute_item(ctx, item_index).await {
                Ok(result) => {
                    tracing::debug!(
                        event = "RECORD_COMPLETE",
                        item_index,
                        rows = result.row_count()
                    );
                    output.push(result);
                }
                Err(err) if ctx.continue_on_fail() => {
                    tracing::warn!(
                        event = "RECORD_FAILED",
                        item_index,
                        code = err.code(),
                        error = %err
                    );
                    failed += 1;
                    output.push(OperationResult::error(err.to_string()));
                }
                Err(err) => {
                    tracing::error!(
                        event = "RUN_ABORTED",
                        item_index,
                        code = err.code(),
                        error = %err
                    );
                    return Err(err);
                }
            }
        }

        tracing::info!(
            event = "RUN_COMPLETE",
            items = ctx.item_count(),
            failed,
            rows = output.len()
        );
        Ok(output.into_rows())
    }

    /// Resolve and execute a single record
    pub async fn execute_item<C: NodeContext + ?Sized>(
        &mut self,
        ctx: &C,
        item_index: usize,
    ) -> NodeResult<OperationResult> {
        let request = OperationRequest::resolve(ctx, item_index, &mut self.ids)?;
        self.dispatch(&request, item_index).await
    }

    /// Send a resolved request to the backend
    pub async fn dispatch(
        &self,
        request: &OperationRequest,
        item_index: usize,
    ) -> NodeResult<OperationResult> {
        let db = self.database_id.as_str();
        let collection = request.collection_id.as_str();
        let backend_err = |e| NodeError::backend(item_index, e);

        tracing::debug!(
            event = "RECORD_DISPATCH",
            item_index,
            operation = %request.operation,
            collection,
            queries = request.queries.len()
        );

        match request.operation {
            Operation::Get => {
                let document_id = document_id(request, item_index)?;
                let doc = self
                    .backend
                    .get_document(db, collection, document_id)
                    .await
                    .map_err(backend_err)?;
                Ok(OperationResult::Document(doc))
            }
            Operation::List => {
                let list = self
                    .backend
                    .list_documents(db, collection, &request.queries)
                    .await
                    .map_err(backend_err)?;
                if request.return_all {
                    Ok(OperationResult::Documents(list.documents))
                } else {
                    Ok(OperationResult::Document(list.into_envelope()))
                }
            }
            Operation::Create => {
                let document_id = document_id(request, item_index)?;
                let data = request.document_data.as_ref().ok_or_else(|| {
                    NodeError::configuration(item_index, "Missing required parameter: documentData")
                })?;
                let doc = self
                    .backend
                    .create_document(
                        db,
                        collection,
                        document_id,
                        data,
                        request.permissions_for_backend(),
                    )
                    .await
                    .map_err(backend_err)?;
                Ok(OperationResult::Document(doc))
            }
        }
    }
}

fn document_id(request: &OperationRequest, item_index: usize) -> NodeResult<&str> {
    request
        .document_id
        .as_deref()
        .ok_or_else(|| NodeError::configuration(item_index, "Missing required parameter: documentId"))
}
