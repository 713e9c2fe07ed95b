/// Errors from managing the polling thread.
#[derive(thiserror::Error, Debug)]
pub enum OrientationError {
    #[error("failed to spawn orientation thread {name:?}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
