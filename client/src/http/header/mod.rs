mod www_authenticate;

pub use self::www_authenticate::{parse as parse_www_authenticate, AuthError, WwwAuthenticate};

/// `X-SLURM-USER-TOKEN`: a JWT issued by `scontrol token` or an auth proxy.
pub const SLURM_USER_TOKEN: &str = "x-slurm-user-token";
/// `X-SLURM-USER-NAME`: user to act as when the token belongs to `SlurmUser`.
pub const SLURM_USER_NAME: &str = "x-slurm-user-name";
