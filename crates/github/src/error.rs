//! Translation of `octocrab` failures into the platform's port error.

use platform::TrackerError;

/// Maps a client-library error onto the tracker port taxonomy.
///
/// Responses the GitHub API answered itself keep their status and message:
/// 401/403 become credential rejections, everything else a remote
/// operation error. Failures without a GitHub response (connection,
/// TLS, serialisation) are transport-level.
pub(crate) fn map_octocrab(error: octocrab::Error) -> TrackerError {
    match error {
        octocrab::Error::GitHub { source, .. } => {
            let status = source.status_code.as_u16();
            if status == 401 || status == 403 {
                TrackerError::CredentialsRejected {
                    message: source.message,
                }
            } else {
                TrackerError::Remote {
                    status: Some(status),
                    message: source.message,
                }
            }
        }
        other => TrackerError::Transport {
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}
