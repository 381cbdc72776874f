use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Push;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Load, Fetch, Parse, Route, Send, Digest }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Load => "load",
        Phase::Fetch => "fetch",
        Phase::Parse => "parse",
        Phase::Route => "route",
        Phase::Send => "send",
        Phase::Digest => "digest",
    }}
    fn span(&self) -> Span { match self {
        Phase::Load => info_span!("load"),
        Phase::Fetch => info_span!("fetch"),
        Phase::Parse => info_span!("parse"),
        Phase::Route => info_span!("route"),
        Phase::Send => info_span!("send"),
        Phase::Digest => info_span!("digest"),
    }}
}

impl OpMarker for Push {
    const NAME: &'static str = "push";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("push") }
}
