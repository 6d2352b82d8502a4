//! # Rpcweave
//! Turns annotated remote-call procedures into a writer, a reader and a logic procedure
//! each, assigns them ids that are stable across an inheritance hierarchy, and produces the
//! dispatch tables the runtime routes incoming calls with.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

pub use rpcweave_shared as shared;

mod classifier;
mod coordinator;
mod dispatch;
mod error;
mod kind_set;
mod partition;
mod rewriter;
mod rpc_config;
mod synthesizer;
mod weaver_config;


pub use classifier::{
    classify, count_rpc_procedures, rpc_annotations, Classification, RpcAnnotation,
};
pub use coordinator::{HierarchyCounter, TypeReport, WeaveOutcome, Weaver};
pub use dispatch::{DispatchEntry, DispatchHandler, DispatchRegistration, DispatchTable};
pub use error::{LinkError, SynthesisError, ValidationError, WeaveError};
pub use kind_set::KindSet;
pub use partition::{partition, ParameterRole, Partition};
pub use rewriter::{redirect_base_calls, redirect_original, VirtualLogicLink};
pub use rpc_config::RpcAttributeConfig;
pub use synthesizer::{reader_parameters, SynthesizedTriad, Synthesizer};
pub use weaver_config::{WeaverConfig, MAX_RPC_ALLOWANCE};
