/**
Converts environment variables into Cargo cfgs that the decoder can switch on.

The decoder reads its window through a handful of unchecked indexing macros.
A `checked` build swaps those for their checked counterparts, which is what
tests and the fuzzer want.
*/
pub mod config {
    use std::{collections::BTreeSet, env};

    /**
    The set of custom cfgs this crate may be built with.

    Every one of them is declared to `rustc` through `rustc-check-cfg`, whether it's enabled or not.
    */
    const KNOWN: &[&str] = &["checked", "published", "debug", "release", "unstable"];

    #[derive(Debug)]
    pub struct Cfgs {
        enabled: BTreeSet<&'static str>,
    }

    impl Cfgs {
        /**
        Read the build profile, the toolchain channel and any `SQUIRRELSTREAM_*` switches.
        */
        pub fn new() -> Self {
            let mut enabled = BTreeSet::new();

            if env_equals("PROFILE", "release") {
                enabled.insert("release");
            }

            if env_equals("PROFILE", "debug") {
                enabled.insert("debug");
            }

            // nightly-only benches are gated on this
            if version_check::is_feature_flaggable().unwrap_or(false) {
                enabled.insert("unstable");
            }

            for switch in ["checked", "published"] {
                if env_switch(switch) {
                    enabled.insert(switch);
                }
            }

            Cfgs { enabled }
        }

        fn is(&self, cfg: &str) -> bool {
            self.enabled.contains(cfg)
        }

        pub fn apply(self) {
            if self.is("published") {
                assert!(
                    !self.is("checked"),
                    "a build may be either checked or published, but not both"
                );
                assert!(self.is("release"), "published builds must be optimized");
            }

            println!("cargo:rustc-check-cfg=cfg({})", KNOWN.join(", "));

            for cfg in &self.enabled {
                println!("cargo:rustc-cfg={}", cfg);
            }

            println!("cargo:rerun-if-changed=build.rs");
            println!("cargo:rerun-if-changed=build/config.rs");
        }
    }

    fn env_switch(cfg: &str) -> bool {
        let var = format!("SQUIRRELSTREAM_{}", cfg.to_uppercase());
        println!("cargo:rerun-if-env-changed={}", var);

        matches!(env::var(var), Ok(value) if value != "0")
    }

    fn env_equals(key: &str, value: &str) -> bool {
        println!("cargo:rerun-if-env-changed={}", key);

        matches!(env::var(key), Ok(set) if set == value)
    }
}
