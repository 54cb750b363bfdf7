use crate::{JobState, JobStatus, Localize};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Translates the latest job status into a single display line.
///
/// Total over all inputs: however sparse or malformed the payload, the
/// result is a non-empty string.
pub fn describe(status: &JobStatus, loc: &dyn Localize) -> String {
    match status.state() {
        JobState::Checking => with_endpoint(status, loc.translate("progress.checking")),
        JobState::CheckingAvailability => {
            with_endpoint(status, loc.translate("progress.checking_availability"))
        }
        JobState::Queued => loc.translate("progress.queued"),
        JobState::Downloading => describe_download(status, loc),
        JobState::Processing => loc.translate("progress.processing"),
        JobState::Extracting => match status.file_count {
            Some(count) if count > 0 => {
                format!("{} ({count})", loc.translate("progress.extracting"))
            }
            _ => loc.translate("progress.extracting"),
        },
        JobState::Installing => describe_install(status, loc),
        JobState::Done => loc.translate("progress.done"),
        JobState::Failed | JobState::AuthFailed => match status.error.as_deref() {
            Some(error) if !error.is_empty() => {
                format!("{}: {error}", loc.translate("progress.failed"))
            }
            _ => loc.translate("progress.failed"),
        },
        JobState::Unknown => describe_fallback(status, loc),
    }
}

fn with_endpoint(status: &JobStatus, line: String) -> String {
    match status.endpoint.as_deref() {
        Some(endpoint) if !endpoint.is_empty() => format!("{line} ({endpoint})"),
        _ => line,
    }
}

fn describe_download(status: &JobStatus, loc: &dyn Localize) -> String {
    match (status.bytes_read, status.total_bytes) {
        (Some(read), Some(total)) if total > 0 => {
            let percent = percent_complete(read, total);
            let read_mb = read as f64 / BYTES_PER_MB;
            let total_mb = total as f64 / BYTES_PER_MB;
            format!("{read_mb:.1} MB / {total_mb:.1} MB ({percent}%)")
        }
        _ => loc.translate("progress.downloading"),
    }
}

/// Floor-clamped completion percentage in [0, 100].
pub(crate) fn percent_complete(read: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (read.saturating_mul(100) / total).min(100)
}

fn describe_install(status: &JobStatus, loc: &dyn Localize) -> String {
    let from_list = status
        .installed_files
        .as_ref()
        .and_then(|files| files.last())
        .map(|file| final_segment(file));
    let name = from_list.or_else(|| status.installed_path.as_deref().map(final_segment));
    match name {
        Some(name) if !name.is_empty() => {
            format!("{} {name}", loc.translate("progress.installing"))
        }
        _ => loc.translate("progress.installing"),
    }
}

fn final_segment(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn describe_fallback(status: &JobStatus, loc: &dyn Localize) -> String {
    if let Some(raw) = status.status.as_deref() {
        if !raw.is_empty() {
            return raw.to_string();
        }
    }
    if let Some(message) = status.message.as_deref() {
        if !message.is_empty() {
            return message.to_string();
        }
    }
    loc.translate("progress.working")
}

#[cfg(test)]
mod tests {
    use super::percent_complete;

    #[test]
    fn percent_is_floored() {
        assert_eq!(percent_complete(1, 3), 33);
        assert_eq!(percent_complete(2, 3), 66);
    }

    #[test]
    fn percent_clamps_overshoot() {
        assert_eq!(percent_complete(20, 10), 100);
    }

    #[test]
    fn percent_handles_zero_total() {
        assert_eq!(percent_complete(5, 0), 0);
    }
}
