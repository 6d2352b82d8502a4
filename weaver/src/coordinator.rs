use std::collections::HashMap;

use log::{debug, info};

use rpcweave_shared::{
    Body, CodecService, DiagnosticsSink, Module, ProcedureId, RpcId, SymbolError, TypeIndex,
};

use crate::{
    classifier::{classify, count_rpc_procedures, Classification},
    dispatch::{DispatchHandler, DispatchRegistration, DispatchTable},
    error::{LinkError, SynthesisError, WeaveError},
    rewriter::{redirect_base_calls, redirect_original, VirtualLogicLink},
    synthesizer::{SynthesizedTriad, Synthesizer},
    weaver_config::WeaverConfig,
};

/// Next RPC id within one inheritance hierarchy, and the ceiling it may not pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HierarchyCounter {
    count: u32,
    ceiling: u32,
}

impl HierarchyCounter {
    pub fn new(count: u32, ceiling: u32) -> Self {
        Self { count, ceiling }
    }

    /// Starts after every remote-call procedure declared by the ancestors of `index`.
    pub fn for_type(module: &Module, index: TypeIndex, ceiling: u32) -> Result<Self, SymbolError> {
        let mut count = 0u32;
        for ancestor in module.ancestors(index)? {
            count = count.saturating_add(count_rpc_procedures(module.type_def(ancestor)?));
        }
        Ok(Self::new(count, ceiling))
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    pub fn fits(&self, additional: usize) -> bool {
        u64::from(self.count) + additional as u64 <= u64::from(self.ceiling)
    }

    pub fn next_id(&self) -> RpcId {
        self.count
    }

    pub fn assign(&mut self) -> RpcId {
        let id = self.count;
        self.count += 1;
        id
    }
}

/// Result of processing one type
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeReport {
    pub type_name: String,
    /// Successful procedures, in declaration order
    pub registrations: Vec<DispatchRegistration>,
    /// Procedures that were skipped or cleared
    pub errors: Vec<WeaveError>,
}

/// Result of weaving a whole module
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeaveOutcome {
    pub reports: Vec<TypeReport>,
    /// Type-level and link failures
    pub errors: Vec<WeaveError>,
}

impl WeaveOutcome {
    pub fn report(&self, type_name: &str) -> Option<&TypeReport> {
        self.reports
            .iter()
            .find(|report| report.type_name == type_name)
    }

    /// Every error, type-level and per-procedure
    pub fn all_errors(&self) -> impl Iterator<Item = &WeaveError> {
        self.errors
            .iter()
            .chain(self.reports.iter().flat_map(|report| report.errors.iter()))
    }

    pub fn is_success(&self) -> bool {
        self.all_errors().next().is_none()
    }
}

/// Drives classification, synthesis and rewriting over types, base types first
pub struct Weaver<'a> {
    codec: &'a dyn CodecService,
    config: WeaverConfig,
    dispatch_tables: HashMap<String, DispatchTable>,
    pending_links: Vec<VirtualLogicLink>,
}

impl<'a> Weaver<'a> {
    pub fn new(codec: &'a dyn CodecService, config: WeaverConfig) -> Self {
        Self {
            codec,
            config,
            dispatch_tables: HashMap::new(),
            pending_links: Vec::new(),
        }
    }

    pub fn dispatch_table(&self, type_name: &str) -> Option<&DispatchTable> {
        self.dispatch_tables.get(type_name)
    }

    pub fn pending_links(&self) -> &[VirtualLogicLink] {
        &self.pending_links
    }

    /// Processes every type of `module`, then redirects base calls in virtual logic.
    pub fn weave_module(
        &mut self,
        module: &mut Module,
        diagnostics: &mut dyn DiagnosticsSink,
    ) -> WeaveOutcome {
        let mut outcome = WeaveOutcome::default();

        let order = match module.hierarchy_order() {
            Ok(order) => order,
            Err(error) => {
                let error = WeaveError::from(error);
                diagnostics.log_error(&error.to_string());
                outcome.errors.push(error);
                return outcome;
            }
        };

        for index in order {
            match self.process_type(module, index, diagnostics) {
                Ok(report) => outcome.reports.push(report),
                Err(error) => outcome.errors.push(error),
            }
        }

        outcome.errors.extend(
            self.link_virtual_bases(module, diagnostics)
                .into_iter()
                .map(WeaveError::from),
        );
        outcome
    }

    /// Processes the remote-call procedures declared by one type. Per-procedure failures
    /// are collected in the report; a type-level failure registers nothing.
    pub fn process_type(
        &mut self,
        module: &mut Module,
        index: TypeIndex,
        diagnostics: &mut dyn DiagnosticsSink,
    ) -> Result<TypeReport, WeaveError> {
        let result = self.try_process_type(module, index, diagnostics);
        if let Err(error) = &result {
            diagnostics.log_error(&error.to_string());
        }
        result
    }

    fn try_process_type(
        &mut self,
        module: &mut Module,
        index: TypeIndex,
        diagnostics: &mut dyn DiagnosticsSink,
    ) -> Result<TypeReport, WeaveError> {
        let mut counter = HierarchyCounter::for_type(module, index, self.config.rpc_allowance)?;
        let type_def = module.type_def_mut(index)?;
        let type_name = type_def.name().to_string();
        let mut report = TypeReport {
            type_name: type_name.clone(),
            ..TypeReport::default()
        };

        let mut classified: Vec<(ProcedureId, Classification)> = Vec::new();
        for id in type_def.declared_procedures() {
            match classify(type_def.procedure(id)?, self.codec) {
                Ok(Some(classification)) => classified.push((id, classification)),
                Ok(None) => {}
                Err(error) => {
                    diagnostics.log_error(&error.to_string());
                    report.errors.push(error.into());
                }
            }
        }

        if !counter.fits(classified.len()) {
            self.dispatch_tables.remove(&type_name);
            return Err(WeaveError::QuotaExceeded {
                type_name,
                required: counter
                    .count()
                    .saturating_add(u32::try_from(classified.len()).unwrap_or(u32::MAX)),
                allowance: counter.ceiling(),
            });
        }

        debug!(
            "{}: {} remote-call procedures, ids start at {}",
            type_name,
            classified.len(),
            counter.next_id()
        );

        let synthesizer = Synthesizer::new(self.codec, &self.config);
        for (id, classification) in &classified {
            let result = synthesizer
                .synthesize(type_def, *id, classification, counter.next_id(), diagnostics)
                .and_then(|triad| {
                    redirect_original(type_def, *id, classification, &triad)?;
                    Ok(triad)
                });
            let triad = match result {
                Ok(triad) => triad,
                Err(error) => {
                    type_def.procedure_mut(*id)?.body.fill(Body::empty_return());
                    diagnostics.log_error(&error.to_string());
                    report.errors.push(error.into());
                    continue;
                }
            };

            let rpc_id = counter.assign();
            if type_def.procedure(triad.logic)?.is_virtual() {
                let link = VirtualLogicLink {
                    type_name: type_name.clone(),
                    logic: triad.logic,
                    original: type_def.procedure(*id)?.signature(),
                };
                if !self.pending_links.contains(&link) {
                    self.pending_links.push(link);
                }
            }
            report
                .registrations
                .push(registration(rpc_id, *id, classification, &triad)?);
        }

        let mut table = DispatchTable::new();
        for registration in &report.registrations {
            table.register(registration);
        }
        info!(
            "{}: woven {} remote-call procedures ({} errors)",
            type_name,
            report.registrations.len(),
            report.errors.len()
        );
        self.dispatch_tables.insert(type_name, table);

        Ok(report)
    }

    /// Runs the base-call redirection for every virtual logic procedure recorded so far.
    pub fn link_virtual_bases(
        &mut self,
        module: &mut Module,
        diagnostics: &mut dyn DiagnosticsSink,
    ) -> Vec<LinkError> {
        let mut errors = Vec::new();
        for link in std::mem::take(&mut self.pending_links) {
            match redirect_base_calls(module, &link) {
                Ok(patched) => debug!(
                    "{}: redirected {} base calls of {}",
                    link.type_name, patched, link.original.name
                ),
                Err(error) => {
                    diagnostics.log_error(&error.to_string());
                    errors.push(error);
                }
            }
        }
        errors
    }
}

fn registration(
    rpc_id: RpcId,
    procedure: ProcedureId,
    classification: &Classification,
    triad: &SynthesizedTriad,
) -> Result<DispatchRegistration, SynthesisError> {
    let mut handlers = Vec::new();
    for kind in classification.kinds().kinds() {
        let (reader, reader_ref) =
            triad
                .reader(*kind)
                .ok_or_else(|| SynthesisError::IncompleteTriad {
                    procedure: triad.logic_ref.name.clone(),
                    kind: kind.tag(),
                })?;
        handlers.push(DispatchHandler {
            kind: *kind,
            reader,
            reader_ref: reader_ref.clone(),
            config: classification.config(*kind),
        });
    }
    Ok(DispatchRegistration {
        rpc_id,
        procedure,
        kinds: classification.kinds(),
        run_locally: classification.run_locally(),
        handlers,
    })
}
