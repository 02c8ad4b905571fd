//! Route handlers.
//!
//! A handler is stored in one of four shapes, chosen by the constructor the
//! application calls. The shape says whether the handler wants the request
//! [`Context`] and how many captured path parameters it takes, so the route
//! table can reject a pattern whose capture groups do not line up with the
//! handler before any request arrives.

use std::fmt;
use std::sync::Arc;

use crate::router::context::Context;
use crate::router::error::Error;
use crate::router::reply::Reply;

pub type PlainFn = dyn Fn() -> Reply + Send + Sync;
pub type ContextFn = dyn Fn(&mut Context<'_>) -> Reply + Send + Sync;
pub type ArgsFn = dyn Fn(Vec<String>) -> Reply + Send + Sync;
pub type ContextArgsFn = dyn Fn(&mut Context<'_>, Vec<String>) -> Reply + Send + Sync;

/// A callable bound to a route.
#[derive(Clone)]
pub enum Handler {
    NoContextNoArgs(Arc<PlainFn>),
    ContextOnly(Arc<ContextFn>),
    ArgsOnly { arity: usize, func: Arc<ArgsFn> },
    ContextPlusArgs { arity: usize, func: Arc<ContextArgsFn> },
}

impl Handler {
    /// A handler that needs neither the context nor any captures.
    pub fn plain<F, R>(f: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        let func: Arc<PlainFn> = Arc::new(move || f().into());
        Handler::NoContextNoArgs(func)
    }

    /// A handler that only takes the request context.
    pub fn with_context<F, R>(f: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        let func: Arc<ContextFn> = Arc::new(move |ctx: &mut Context<'_>| f(ctx).into());
        Handler::ContextOnly(func)
    }

    /// A handler taking exactly `arity` captured parameters, in group order.
    pub fn with_args<F, R>(arity: usize, f: F) -> Self
    where
        F: Fn(Vec<String>) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        let func: Arc<ArgsFn> = Arc::new(move |args: Vec<String>| f(args).into());
        Handler::ArgsOnly { arity, func }
    }

    /// A handler taking the context and exactly `arity` captured parameters.
    pub fn with_context_args<F, R>(arity: usize, f: F) -> Self
    where
        F: Fn(&mut Context<'_>, Vec<String>) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        let func: Arc<ContextArgsFn> =
            Arc::new(move |ctx: &mut Context<'_>, args: Vec<String>| f(ctx, args).into());
        Handler::ContextPlusArgs { arity, func }
    }

    /// A handler taking a single captured parameter.
    pub fn arg<F, R>(f: F) -> Self
    where
        F: Fn(String) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        Self::with_args(1, move |args: Vec<String>| f(args.into_iter().next().unwrap_or_default()))
    }

    /// A handler taking the context and a single captured parameter.
    pub fn context_arg<F, R>(f: F) -> Self
    where
        F: Fn(&mut Context<'_>, String) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        Self::with_context_args(1, move |ctx: &mut Context<'_>, args: Vec<String>| {
            f(ctx, args.into_iter().next().unwrap_or_default())
        })
    }

    /// Number of captured parameters the handler takes.
    pub fn arity(&self) -> usize {
        match self {
            Handler::NoContextNoArgs(_) | Handler::ContextOnly(_) => 0,
            Handler::ArgsOnly { arity, .. } | Handler::ContextPlusArgs { arity, .. } => *arity,
        }
    }

    pub fn takes_context(&self) -> bool {
        matches!(self, Handler::ContextOnly(_) | Handler::ContextPlusArgs { .. })
    }

    /// Call the handler with the captured groups of a match.
    ///
    /// The number of captures must equal [`Handler::arity`]; nothing is
    /// truncated or padded.
    pub fn invoke(&self, ctx: &mut Context<'_>, captures: Vec<String>) -> Result<Reply, Error> {
        if captures.len() != self.arity() {
            return Err(Error::ArityMismatch {
                expected: self.arity(),
                found: captures.len(),
            });
        }

        let reply = match self {
            Handler::NoContextNoArgs(func) => func(),
            Handler::ContextOnly(func) => func(ctx),
            Handler::ArgsOnly { func, .. } => func(captures),
            Handler::ContextPlusArgs { func, .. } => func(ctx, captures),
        };
        Ok(reply)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::NoContextNoArgs(_) => f.write_str("NoContextNoArgs"),
            Handler::ContextOnly(_) => f.write_str("ContextOnly"),
            Handler::ArgsOnly { arity, .. } => write!(f, "ArgsOnly({arity})"),
            Handler::ContextPlusArgs { arity, .. } => write!(f, "ContextPlusArgs({arity})"),
        }
    }
}
