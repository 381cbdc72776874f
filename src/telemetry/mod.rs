pub mod config;
pub mod ctx;
pub mod emit;
pub mod ops;

use std::marker::PhantomData;

use ctx::LogCtx;

pub fn push() -> LogCtx<ops::push::Push> { LogCtx { json: config::logs_are_json(), _marker: PhantomData } }
pub fn settings() -> LogCtx<ops::settings::Settings> { LogCtx { json: config::logs_are_json(), _marker: PhantomData } }
