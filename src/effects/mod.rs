//! Gateway operations as Stillwater effects.
//!
//! This module is the "imperative shell" seam for transports: each
//! operation is an effect over any environment that provides a
//! [`PickBanService`], so an async transport can compose them and run them
//! against a real gateway or a test double.
//!
//! Failures never surface as effect errors. As across every external
//! boundary of this crate, a failed update is `false` and a failed query is
//! `None`, which is why the error type is [`Infallible`].

use crate::core::PbState;
use crate::gateway::PickBanService;
use std::convert::Infallible;
use stillwater::effect::Effect;
use stillwater::prelude::*;

/// Submit a full song-state mapping.
pub fn update_state<Env>(request: PbState) -> impl Effect<Output = bool, Error = Infallible, Env = Env>
where
    Env: PickBanService + Clone + Send + Sync + 'static,
{
    from_fn(move |env: &Env| Ok::<_, Infallible>(env.update_state(&request)))
}

pub fn reset_state<Env>() -> impl Effect<Output = bool, Error = Infallible, Env = Env>
where
    Env: PickBanService + Clone + Send + Sync + 'static,
{
    from_fn(|env: &Env| Ok::<_, Infallible>(env.reset_state()))
}

pub fn get_current_state<Env>(
) -> impl Effect<Output = Option<PbState>, Error = Infallible, Env = Env>
where
    Env: PickBanService + Clone + Send + Sync + 'static,
{
    from_fn(|env: &Env| Ok::<_, Infallible>(env.get_current_state()))
}
