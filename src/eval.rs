// src/eval.rs
// Drives a compiled table over an input, firing caller-supplied actions.

use rayon::prelude::*;

use crate::error::{DfaError, Result};
use crate::table::{ActionId, State, StateId, Table};

type ActionFn<C> = dyn Fn(u8, &mut C) + Send + Sync;

/// Ordered callbacks addressed by the action indices in a table.
/// Each receives the current input byte and the caller's context.
pub struct ActionSet<C> {
    actions: Vec<Box<ActionFn<C>>>,
}

impl<C> Default for ActionSet<C> {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
        }
    }
}

impl<C> ActionSet<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ActionSet::push`].
    pub fn with<F>(mut self, f: F) -> Self
    where
        F: Fn(u8, &mut C) + Send + Sync + 'static,
    {
        self.push(f);
        self
    }

    /// Appends a callback and returns the index tables use to refer to it.
    pub fn push<F>(&mut self, f: F) -> ActionId
    where
        F: Fn(u8, &mut C) + Send + Sync + 'static,
    {
        self.actions.push(Box::new(f));
        self.actions.len() - 1
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[inline]
    fn call(&self, id: ActionId, b: u8, ctx: &mut C, offset: usize) -> Result<()> {
        let f = self.actions.get(id).ok_or(DfaError::UnknownAction {
            action: id,
            available: self.actions.len(),
            offset,
        })?;
        f(b, ctx);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalOptions {
    /// Stop without error when a state with no transitions is reached while
    /// input remains. Off by default: leftover input at a sink is `NoTransition`.
    pub halt_at_sink: bool,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// Input bytes consumed.
    pub steps: usize,
    pub final_state: StateId,
}

pub struct Evaluator<'t, C> {
    table: &'t Table,
    actions: &'t ActionSet<C>,
    options: EvalOptions,
}

impl<'t, C> Evaluator<'t, C> {
    pub fn new(table: &'t Table, actions: &'t ActionSet<C>) -> Self {
        Self {
            table,
            actions,
            options: EvalOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EvalOptions) -> Self {
        self.options = options;
        self
    }

    fn state(&self, id: StateId) -> Result<&'t State> {
        self.table
            .state(id)
            .ok_or(DfaError::InvalidState { index: id })
    }

    /// Runs from the entry state until the input is exhausted.
    pub fn run(&self, input: &[u8], ctx: &mut C) -> Result<Run> {
        let mut current = Table::ENTRY;
        let mut state = self.state(current)?;

        for (offset, &b) in input.iter().enumerate() {
            if self.options.halt_at_sink && state.is_sink() {
                log::debug!(
                    "[eval] halted at sink `{}` with {} bytes left",
                    self.table.state_name(current),
                    input.len() - offset
                );
                return Ok(Run {
                    steps: offset,
                    final_state: current,
                });
            }

            let tr = state.transition_for(b).ok_or_else(|| DfaError::NoTransition {
                state: self.table.state_name(current),
                byte: b,
                offset,
            })?;

            for &a in &tr.actions {
                self.actions.call(a, b, ctx, offset)?;
            }

            log::trace!("[eval] {offset}: {:?} #{current} -> #{}", b as char, tr.to);
            current = tr.to;
            state = self.state(current)?;
        }

        log::debug!(
            "[eval] consumed {} bytes, stopped in `{}`",
            input.len(),
            self.table.state_name(current)
        );
        Ok(Run {
            steps: input.len(),
            final_state: current,
        })
    }

    /// Evaluates every input against the same table in parallel, each with a
    /// fresh context from `make_ctx`. Results come back in input order.
    pub fn run_batch<I, F>(&self, inputs: &[I], make_ctx: F) -> Vec<Result<(C, Run)>>
    where
        I: AsRef<[u8]> + Sync,
        F: Fn() -> C + Sync,
        C: Send,
    {
        inputs
            .par_iter()
            .map(|input| {
                let mut ctx = make_ctx();
                let run = self.run(input.as_ref(), &mut ctx)?;
                Ok((ctx, run))
            })
            .collect()
    }
}

/// One-shot evaluation with default options.
pub fn evaluate<C>(
    table: &Table,
    input: &[u8],
    actions: &ActionSet<C>,
    ctx: &mut C,
) -> Result<Run> {
    Evaluator::new(table, actions).run(input, ctx)
}
