//! Validator injection.
//!
//! [`ValidatorMiddleware`] puts one shared [`Validator`] into the
//! [`Locals`](crate::Locals) of every request it sees, so handlers can fetch
//! it with [`get_validator`] instead of building their own.
//!
//! # One engine, first configuration wins
//!
//! The engine lives in an [`EngineCell`] and is built exactly once, by the
//! first middleware constructed against that cell. That first [`Config`]
//! decides the engine: its `validator` override and its custom rules. Every
//! later middleware on the same cell reuses the engine as is; its own
//! `validator` and `rules` are ignored (logged at `debug`), and only its
//! skip predicate and context key take effect.
//!
//! [`ValidatorMiddleware::new`] uses a process-wide cell, so the rule above
//! holds for the whole process. Pass your own cell to
//! [`ValidatorMiddleware::with_cell`] to scope it to one application.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, trace, warn};

use super::{Middleware, Next};
use crate::handler::BoxFuture;
use crate::request::Request;
use crate::validation::{FieldLevel, RuleFn, Validator};

/// Key used when none (or an empty one) is configured.
pub const DEFAULT_CONTEXT_KEY: &str = "validator";

/// Decides per request whether the middleware steps aside.
pub type SkipFn = Arc<dyn Fn(&Request) -> bool + Send + Sync>;

static GLOBAL: EngineCell = EngineCell::new();

// ── Config ────────────────────────────────────────────────────────────────────

/// Settings for [`ValidatorMiddleware`].
///
/// ```rust
/// use tsu_validator::middleware::Config;
///
/// let config = Config::new()
///     .context_key("validator")
///     .skip(|req| req.path() == "/health")
///     .rule("even", |fl| matches!(fl.value().as_i64(), Some(n) if n % 2 == 0));
/// ```
pub struct Config {
    skip: Option<SkipFn>,
    validator: Option<Validator>,
    context_key: String,
    rules: Vec<(String, RuleFn)>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the middleware for requests where `f` returns `true`; nothing is
    /// stored for them.
    pub fn skip<F>(mut self, f: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.skip = Some(Arc::new(f));
        self
    }

    /// Use this engine instead of a fresh [`Validator::new`].
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Where the engine is stored in the request locals. An empty key means
    /// [`DEFAULT_CONTEXT_KEY`].
    pub fn context_key(mut self, key: impl Into<String>) -> Self {
        self.context_key = key.into();
        self
    }

    /// Registers a custom rule on the engine when it is built.
    pub fn rule<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&FieldLevel<'_>) -> bool + Send + Sync + 'static,
    {
        self.rules.push((name.into(), Arc::new(rule)));
        self
    }

    fn resolved_key(&self) -> String {
        if self.context_key.is_empty() {
            DEFAULT_CONTEXT_KEY.to_owned()
        } else {
            self.context_key.clone()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skip: None,
            validator: None,
            context_key: DEFAULT_CONTEXT_KEY.to_owned(),
            rules: Vec::new(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("skip", &self.skip.is_some())
            .field("validator", &self.validator)
            .field("context_key", &self.context_key)
            .field("rules", &self.rules.iter().map(|(name, _)| name).collect::<Vec<_>>())
            .finish()
    }
}

// ── EngineCell ────────────────────────────────────────────────────────────────

/// Holds the shared engine; builds it at most once.
#[derive(Debug, Default)]
pub struct EngineCell {
    engine: OnceLock<Arc<Validator>>,
}

impl EngineCell {
    pub const fn new() -> Self {
        Self { engine: OnceLock::new() }
    }

    /// The engine, if some middleware has built it already.
    pub fn get(&self) -> Option<Arc<Validator>> {
        self.engine.get().cloned()
    }

    /// Returns the engine, building it from `validator` and `rules` if this
    /// is the first call, and whether this call built it. Later calls ignore
    /// their arguments.
    fn get_or_init(
        &self,
        validator: Option<Validator>,
        rules: Vec<(String, RuleFn)>,
    ) -> (Arc<Validator>, bool) {
        let mut built = false;
        let engine = self.engine.get_or_init(|| {
            built = true;
            let mut engine = validator.unwrap_or_default();
            for (name, rule) in rules {
                if let Err(e) = engine.register_rule(&name, rule) {
                    warn!(rule = %name, "skipping custom validation rule: {e}");
                }
            }
            debug!(?engine, "validation engine initialised");
            Arc::new(engine)
        });
        (Arc::clone(engine), built)
    }
}

// ── Middleware ────────────────────────────────────────────────────────────────

/// Stores the shared [`Validator`] in each request's locals.
///
/// ```rust,no_run
/// use tsu_validator::middleware::{Config, ValidatorMiddleware};
/// use tsu_validator::Router;
///
/// let app = Router::new().layer(ValidatorMiddleware::new(
///     Config::new().skip(|req| req.path() == "/health"),
/// ));
/// ```
pub struct ValidatorMiddleware {
    skip: Option<SkipFn>,
    context_key: String,
    engine: Arc<Validator>,
}

impl ValidatorMiddleware {
    /// Builds the middleware against the process-wide engine cell.
    pub fn new(config: Config) -> Self {
        Self::with_cell(&GLOBAL, config)
    }

    /// Builds the middleware against `cell`.
    pub fn with_cell(cell: &EngineCell, config: Config) -> Self {
        let context_key = config.resolved_key();
        let has_engine_settings = config.validator.is_some() || !config.rules.is_empty();
        let (engine, built) = cell.get_or_init(config.validator, config.rules);
        if !built && has_engine_settings {
            debug!(
                context_key = %context_key,
                "validation engine already built; ignoring validator and rules from this config"
            );
        }
        Self { skip: config.skip, context_key, engine }
    }

    /// The shared engine this middleware injects.
    pub fn validator(&self) -> &Arc<Validator> {
        &self.engine
    }

    pub fn context_key(&self) -> &str {
        &self.context_key
    }
}

impl Default for ValidatorMiddleware {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl fmt::Debug for ValidatorMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorMiddleware")
            .field("skip", &self.skip.is_some())
            .field("context_key", &self.context_key)
            .field("engine", &self.engine)
            .finish()
    }
}

impl Middleware for ValidatorMiddleware {
    fn call(&self, mut req: Request, next: Next) -> BoxFuture {
        if let Some(skip) = &self.skip {
            if skip(&req) {
                trace!(path = req.path(), "validator middleware skipped");
                return next.run(req);
            }
        }

        req.locals_mut().insert(self.context_key.as_str(), Arc::clone(&self.engine));
        next.run(req)
    }
}

// ── Context accessor ──────────────────────────────────────────────────────────

/// The engine stored under [`DEFAULT_CONTEXT_KEY`], if any.
pub fn get_validator(req: &Request) -> Option<Arc<Validator>> {
    get_validator_with_key(req, DEFAULT_CONTEXT_KEY)
}

/// The engine stored under `key`. `None` when nothing is stored there or the
/// stored value is not a [`Validator`].
pub fn get_validator_with_key(req: &Request, key: &str) -> Option<Arc<Validator>> {
    req.locals().get::<Validator>(key)
}
