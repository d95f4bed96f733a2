//! Sandboxed, at-most-once execution of model-authored code blocks.
//!
//! Each executable unit is evaluated exactly once, as a function body, in a
//! fresh engine context holding only the capability set and a fresh
//! rendering surface. Execution is synchronous and blocking; a thrown
//! failure is captured on the unit's result and never propagates to sibling
//! units or to the host.

use crate::exec::capabilities;
use crate::exec::surface::RenderSurface;
use boa_engine::{Context, JsError, Source, js_string};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fallback failure message when a thrown value has no usable description.
const GENERIC_FAILURE: &str = "execution failed";

/// Terminal state of one execution attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// Evaluation returned normally.
    Completed {
        /// Canonical string form of the returned value, or `None` when the
        /// code returned no value (surface-only blocks are valid).
        value: Option<String>,
    },

    /// Evaluation threw.
    Failed {
        /// Human-readable description of the failure.
        message: String,
    },
}

/// Result of one execution attempt: the outcome plus the surface the code
/// mutated along the way. Mutations made before a failure are not rolled
/// back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// How the attempt ended.
    pub outcome: Outcome,

    /// The surface owned by this attempt.
    pub surface: RenderSurface,
}

/// At-most-once execution guard for one executable unit instance.
///
/// The slot starts pending and settles exactly once; repeat render passes
/// receive the cached result. Slots are keyed by unit identity, never by
/// content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionSlot {
    result: Option<ExecutionResult>,
}

impl ExecutionSlot {
    /// Creates a pending slot.
    #[must_use]
    pub const fn new() -> Self {
        Self { result: None }
    }

    /// Returns true while no execution attempt has been made.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.result.is_none()
    }

    /// Returns the settled result, if any.
    #[must_use]
    pub const fn result(&self) -> Option<&ExecutionResult> {
        self.result.as_ref()
    }

    /// Executes `code` if the slot is still pending, otherwise returns the
    /// cached result unchanged.
    pub fn run_once(&mut self, runner: &Runner, code: &str) -> &ExecutionResult {
        self.result.get_or_insert_with(|| runner.run(code))
    }
}

/// Sandboxed runner for executable units.
///
/// Stateless: every [`Runner::run`] call builds a fresh engine context, so
/// the capability handles are effectively read-only across sequential
/// executions and the surface is exclusively owned by one attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct Runner;

impl Runner {
    /// Creates a runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluates one code body against the capability set.
    ///
    /// The body is wrapped as a function body, so `return` yields the
    /// block's value. A returned non-undefined value is stringified through
    /// the value's own string conversion; returning nothing yields
    /// `Completed(None)`. A throw yields `Failed` with the thrown value's
    /// `message` property when present, its string coercion otherwise.
    #[must_use]
    pub fn run(&self, code: &str) -> ExecutionResult {
        let mut context = Context::default();

        if let Err(e) = capabilities::install(&mut context) {
            // Engine setup failed; report it like any other failed attempt
            return ExecutionResult {
                outcome: Outcome::Failed {
                    message: describe_error(e, &mut context),
                },
                surface: RenderSurface::default(),
            };
        }

        let wrapped = format!("(function() {{\n{code}\n}})()");
        debug!(code_len = code.len(), "executing code block");

        let outcome = match context.eval(Source::from_bytes(wrapped.as_bytes())) {
            Ok(value) if value.is_undefined() => Outcome::Completed { value: None },
            Ok(value) => match value.to_string(&mut context) {
                Ok(s) => Outcome::Completed {
                    value: Some(s.to_std_string_escaped()),
                },
                Err(e) => Outcome::Failed {
                    message: describe_error(e, &mut context),
                },
            },
            Err(e) => Outcome::Failed {
                message: describe_error(e, &mut context),
            },
        };

        ExecutionResult {
            outcome,
            surface: snapshot_surface(&mut context),
        }
    }
}

/// Extracts a human-readable message from a thrown value.
///
/// Prefers the thrown object's `message` property, then its string
/// coercion, then a generic fallback.
fn describe_error(error: JsError, context: &mut Context) -> String {
    let thrown = error.to_opaque(context);

    if let Some(object) = thrown.as_object()
        && let Ok(message) = object.get(js_string!("message"), context)
        && !message.is_undefined()
        && let Ok(text) = message.to_string(context)
    {
        let text = text.to_std_string_escaped();
        if !text.is_empty() {
            return text;
        }
    }

    if let Ok(text) = thrown.to_string(context) {
        let text = text.to_std_string_escaped();
        if !text.is_empty() {
            return text;
        }
    }

    GENERIC_FAILURE.to_string()
}

/// Reads the rendering surface back out of the context.
///
/// Runs after every attempt, failed or not, so partial mutations made
/// before a throw stay visible.
fn snapshot_surface(context: &mut Context) -> RenderSurface {
    let Ok(value) = context.eval(Source::from_bytes(b"__surfaceSnapshot()")) else {
        return RenderSurface::default();
    };
    let Ok(json) = value.to_string(context) else {
        return RenderSurface::default();
    };
    serde_json::from_str(&json.to_std_string_escaped()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::surface::Artifact;

    #[test]
    fn test_returned_value_is_stringified() {
        let result = Runner::new().run("return 2+2;");
        assert_eq!(
            result.outcome,
            Outcome::Completed {
                value: Some("4".to_string())
            }
        );
        assert!(result.surface.is_empty());
    }

    #[test]
    fn test_array_uses_js_coercion() {
        let result = Runner::new().run("return [1, 2, 3];");
        assert_eq!(
            result.outcome,
            Outcome::Completed {
                value: Some("1,2,3".to_string())
            }
        );
    }

    #[test]
    fn test_no_return_yields_no_value() {
        let result = Runner::new().run("const x = 2 + 2;");
        assert_eq!(result.outcome, Outcome::Completed { value: None });
    }

    #[test]
    fn test_plot_only_block() {
        let result =
            Runner::new().run("Plotly.newPlot(container, [{x: [1, 2], y: [3, 4]}]);");

        assert_eq!(result.outcome, Outcome::Completed { value: None });
        assert_eq!(result.surface.artifacts.len(), 1);
        assert!(matches!(result.surface.artifacts[0], Artifact::Plot { .. }));
    }

    #[test]
    fn test_chart_constructor_records_artifact() {
        let result = Runner::new().run("new Chart(container, {type: 'bar', data: {}});");

        assert_eq!(result.outcome, Outcome::Completed { value: None });
        assert!(matches!(
            result.surface.artifacts[0],
            Artifact::Chart { .. }
        ));
    }

    #[test]
    fn test_thrown_error_message_is_captured() {
        let result = Runner::new().run("throw new Error(\"bad\")");
        assert_eq!(
            result.outcome,
            Outcome::Failed {
                message: "bad".to_string()
            }
        );
    }

    #[test]
    fn test_thrown_primitive_is_captured() {
        let result = Runner::new().run("throw \"plain failure\"");
        assert_eq!(
            result.outcome,
            Outcome::Failed {
                message: "plain failure".to_string()
            }
        );
    }

    #[test]
    fn test_syntax_error_is_a_failure() {
        let result = Runner::new().run("return ((");
        assert!(matches!(result.outcome, Outcome::Failed { .. }));
    }

    #[test]
    fn test_mutations_before_failure_survive() {
        let result = Runner::new().run("container.append('partial'); throw new Error('late');");

        assert_eq!(
            result.outcome,
            Outcome::Failed {
                message: "late".to_string()
            }
        );
        assert_eq!(
            result.surface.artifacts,
            vec![Artifact::Text {
                content: "partial".to_string()
            }]
        );
    }

    #[test]
    fn test_capability_access() {
        let result = Runner::new().run("return math.sqrt(ss.mean([4, 4]));");
        assert_eq!(
            result.outcome,
            Outcome::Completed {
                value: Some("2".to_string())
            }
        );
    }

    #[test]
    fn test_slot_runs_at_most_once() {
        let runner = Runner::new();
        let mut slot = ExecutionSlot::new();
        assert!(slot.is_pending());

        let first = slot.run_once(&runner, "return 1;").clone();
        // A second call with different code proves nothing re-executes
        let second = slot.run_once(&runner, "return 2;").clone();

        assert_eq!(first, second);
        assert_eq!(
            first.outcome,
            Outcome::Completed {
                value: Some("1".to_string())
            }
        );
        assert!(!slot.is_pending());
    }

    #[test]
    fn test_fresh_surface_per_execution() {
        let runner = Runner::new();
        let first = runner.run("container.append('one');");
        let second = runner.run("return 0;");

        assert_eq!(first.surface.artifacts.len(), 1);
        assert!(second.surface.is_empty());
    }
}
