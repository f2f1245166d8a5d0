use std::time::Duration;

use crate::error::Error;

pub(crate) fn record_ok(netfn: u8, cmd: u8, sequence: u32, elapsed: Duration, completion_code: u8) {
    let _ = (netfn, cmd, sequence, elapsed, completion_code);

    #[cfg(feature = "metrics")]
    {
        metrics::counter!("ipmi_requests_total", "outcome" => "ok").increment(1);
        metrics::histogram!("ipmi_request_seconds").record(elapsed.as_secs_f64());
        if completion_code != 0x00 {
            metrics::counter!("ipmi_completion_code_nonzero_total").increment(1);
        }
    }

    #[cfg(feature = "tracing")]
    {
        tracing::debug!(
            netfn,
            cmd,
            sequence,
            completion_code,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "ipmi request ok"
        );
    }
}

pub(crate) fn record_err(netfn: u8, cmd: u8, sequence: u32, elapsed: Duration, err: &Error) {
    let _ = (netfn, cmd, sequence, elapsed, err);

    #[cfg(feature = "metrics")]
    {
        metrics::counter!("ipmi_requests_total", "outcome" => "err").increment(1);
        metrics::counter!("ipmi_request_errors_total", "kind" => error_kind(err)).increment(1);
        metrics::histogram!("ipmi_request_seconds").record(elapsed.as_secs_f64());
    }

    #[cfg(feature = "tracing")]
    {
        tracing::warn!(
            netfn,
            cmd,
            sequence,
            error = %err,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "ipmi request failed"
        );
    }
}

#[cfg(feature = "metrics")]
fn error_kind(err: &Error) -> &'static str {
    match err {
        Error::ShortPacket => "short_packet",
        Error::InvalidPacket(_) => "invalid_packet",
        Error::UnsupportedAuth(_) => "unsupported_auth",
        Error::Connect(_) => "connect",
        Error::Timeout => "timeout",
        Error::NoSupportedAuthType => "no_supported_auth_type",
        Error::CompletionCode(_) => "completion_code",
        Error::Io(_) => "io",
        Error::Closed => "closed",
    }
}
