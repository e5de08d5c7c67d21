//! Build script for mapclash
//!
//! Windows: embeds the application manifest for long path support.
//!
//! # Windows Long Path Support
//!
//! By default, Windows limits file paths to 260 characters (MAX_PATH).
//! Server resource trees (`resources/[maps]/[mlo]/some_mlo/stream/...`)
//! regularly go past that.
//!
//! The manifest file (`mapclash.manifest`) sets `longPathAware=true`, which,
//! combined with the Windows 10 v1607+ registry setting, enables paths up to
//! 32,767 characters.

fn main() {
    #[cfg(windows)]
    {
        // The .rc file embeds the manifest as an RT_MANIFEST resource
        embed_resource::compile("mapclash.rc", embed_resource::NONE);

        println!("cargo:rerun-if-changed=mapclash.rc");
        println!("cargo:rerun-if-changed=mapclash.manifest");
    }
}
