//! Typed record operations.

use deskboard_models::{Payload, Record};

use crate::client::Mutation;
use crate::error::Result;

/// A create, update or delete of one record of type `R`.
#[derive(Debug, Clone)]
pub enum Operation<R: Record> {
    Create(R::Draft),
    Update { id: String, patch: R::Patch },
    Delete { id: String },
}

impl<R: Record> Operation<R> {
    /// Update of the record with id `id`.
    pub fn update(id: impl Into<String>, patch: R::Patch) -> Self {
        Operation::Update {
            id: id.into(),
            patch,
        }
    }

    /// Delete of the record with id `id`.
    pub fn delete(id: impl Into<String>) -> Self {
        Operation::Delete { id: id.into() }
    }

    /// Validates the payload and converts it into a wire mutation.
    ///
    /// Fails with [`SyncError::Validation`](crate::SyncError::Validation)
    /// without touching any store.
    pub fn into_mutation(self) -> Result<Mutation> {
        let mutation = match self {
            Operation::Create(draft) => {
                draft.validate()?;
                Mutation::Insert {
                    payload: draft.to_payload()?,
                }
            }
            Operation::Update { id, patch } => {
                require_id(&id)?;
                patch.validate()?;
                Mutation::Update {
                    id,
                    changes: patch.to_payload()?,
                }
            }
            Operation::Delete { id } => {
                require_id(&id)?;
                Mutation::Delete { id }
            }
        };
        Ok(mutation)
    }
}

fn require_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(deskboard_models::ValidationError::EmptyField("id").into());
    }
    Ok(())
}
