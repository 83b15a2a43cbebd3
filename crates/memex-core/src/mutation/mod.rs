//! Batched multi-document writes

mod batch;
mod plans;

pub use batch::{BatchedMutation, FieldUpdate, Precondition, Write, WriteBatch, WriteOp};
pub use plans::{CounterEffect, MutationPlan};
