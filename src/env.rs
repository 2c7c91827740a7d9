//! Settings read once from the process environment.
//!
//! - `NONDE_MAX_STEPS`: default step limit for runs
//! - `NONDE_VERBOSE=1`: print status messages

use std::{cell::RefCell, ffi::OsStr};

#[derive(Clone, Copy, Debug, Default)]
struct Env {
    max_steps: Option<u64>,
    verbose: bool,
}

thread_local! {
    /// Must only be mutated within `set_env`
    static ENV: RefCell<Option<Env>> = const { RefCell::new(None) };
}

pub fn init() {
    let value = Env {
        max_steps: std::env::var("NONDE_MAX_STEPS")
            .ok()
            .and_then(|v| parse_steps(&v)),
        verbose: var_is("NONDE_VERBOSE", "1"),
    };
    set_env(value);
}

pub fn max_steps() -> Option<u64> {
    with_env(|env| env.max_steps)
}

pub fn is_verbose() -> bool {
    with_env(|env| env.verbose)
}

/// Positive step count. Anything else means no limit.
fn parse_steps(value: &str) -> Option<u64> {
    value.trim().parse().ok().filter(|&n| n > 0)
}

fn set_env(value: Env) {
    ENV.with(|env| {
        let mut env = env.borrow_mut();
        assert!(
            env.is_none(),
            "tried to initialize environment state multiple times"
        );
        *env = Some(value);
    });
}

fn with_env<F, R>(callback: F) -> R
where
    F: Fn(&Env) -> R,
{
    ENV.with(|env| {
        let env = env.borrow();
        let env = env.unwrap_or_else(|| {
            panic!("tried to access environment state before initialization");
        });
        callback(&env)
    })
}

fn var_is(name: impl AsRef<OsStr>, value: impl AsRef<str>) -> bool {
    std::env::var(name.as_ref()).is_ok_and(|v| v == value.as_ref())
}
