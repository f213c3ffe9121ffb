use super::*;
use crate::config::EngineConfig;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Flags the platform was initialized with. Set exactly once per process.
static V8_FLAGS: OnceLock<String> = OnceLock::new();

/// The root of the ownership graph.
///
/// Creating the first `Instance` initializes the engine platform for the whole process. The
/// platform is never torn down again: the engine cannot be re-initialized after disposal, so
/// dropping an `Instance` only releases what this handle tracks.
///
/// `Instance` is `Send + Sync`. Several threads may each create their own [`Isolate`] from a
/// shared instance.
#[derive(Debug)]
pub struct Instance {
    host_path: PathBuf,
    config: EngineConfig,
    live_isolates: AtomicUsize,
}

impl Instance {
    /// Creates an instance with the default [`EngineConfig`].
    pub fn new() -> EngineResult<Self> {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let host_path = host_path()?;
        init_v8(&host_path, &config);

        Ok(Self {
            host_path,
            config,
            live_isolates: AtomicUsize::new(0),
        })
    }

    /// Creates a new isolated heap and execution context.
    ///
    /// The isolate borrows this instance, so the instance cannot be dropped while it is alive.
    /// Fails with [`EngineError::IsolateLimit`] when `max_isolates` is configured and that many
    /// isolates from this instance are alive.
    pub fn new_isolate(&self) -> EngineResult<Isolate<'_>> {
        let limit = self.config.max_isolates.unwrap_or(usize::MAX);
        let live = self
            .live_isolates
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |live| {
                (live < limit).then_some(live + 1)
            })
            .map_err(|_| EngineError::IsolateLimit { limit })?
            + 1;

        let isolate = Isolate::new(self, self.config.create_params());
        debug!("created isolate {} ({} live)", isolate.id(), live);
        Ok(isolate)
    }

    /// The executable path the engine was initialized for.
    pub fn host_path(&self) -> &Path {
        &self.host_path
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of isolates created from this instance that have not been dropped yet.
    pub fn live_isolates(&self) -> usize {
        self.live_isolates.load(Ordering::SeqCst)
    }

    pub fn engine_version(&self) -> &'static str {
        v8::V8::get_version()
    }

    /// Releases the instance. Every isolate created from it must already be gone, which the
    /// borrow checker guarantees.
    pub fn dispose(self) {
        drop(self)
    }

    pub(crate) fn release_isolate(&self) {
        self.live_isolates.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        debug!("disposing engine instance for {}", self.host_path.display());
    }
}

fn host_path() -> EngineResult<PathBuf> {
    std::env::args_os()
        .next()
        .filter(|arg| !arg.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::current_exe().ok())
        .ok_or(EngineError::HostPathUnavailable)
}

fn init_v8(host_path: &Path, config: &EngineConfig) {
    let flags = config.flag_string();
    let applied = V8_FLAGS.get_or_init(|| {
        if !flags.is_empty() {
            v8::V8::set_flags_from_string(&flags);
        }
        let platform = v8::new_default_platform(config.platform_threads, false).make_shared();
        v8::V8::initialize_platform(platform);
        v8::V8::initialize();

        info!(
            "initialized V8 {} for {}",
            v8::V8::get_version(),
            host_path.display()
        );
        flags.clone()
    });

    if *applied != flags {
        warn!(
            "engine already initialized with flags `{}`, ignoring `{}`",
            applied, flags
        );
    }
}
