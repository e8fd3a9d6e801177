//! Process environment guard for tests that read configuration from env.
//! Callers hold `#[serial]` since the environment is process-wide.

pub(crate) struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    /// Snapshot and clear `keys`; each is restored when the guard drops.
    pub(crate) fn clean(keys: &[&'static str]) -> Self {
        let saved = keys
            .iter()
            .map(|key| (*key, std::env::var(key).ok()))
            .collect();
        for key in keys {
            unsafe {
                std::env::remove_var(key);
            }
        }
        Self { saved }
    }

    pub(crate) fn set(&self, key: &'static str, value: &str) {
        debug_assert!(self.guards(key), "{key} is not restored by this guard");
        unsafe {
            std::env::set_var(key, value);
        }
    }

    fn guards(&self, key: &str) -> bool {
        self.saved.iter().any(|(saved, _)| *saved == key)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, prev) in &self.saved {
            match prev {
                Some(value) => unsafe {
                    std::env::set_var(key, value);
                },
                None => unsafe {
                    std::env::remove_var(key);
                },
            }
        }
    }
}
