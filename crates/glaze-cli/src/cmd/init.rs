use anyhow::Context;
use glaze_core::{config::Config, io, paths};
use std::path::Path;

const MANIFEST_SKELETON: &str = "\
# Per-document feature targets for `glaze patch --manifest`.
# Keys are template paths relative to templates.dir; an empty list targets
# the whole catalog.
#
# documents:
#   edit_bus.html: [floating_orbs, animated_bg, dark_theme_css]
#   students_lazy.html: []
documents: {}
";

pub fn run(root: &Path, with_manifest: bool) -> anyhow::Result<()> {
    println!("Initializing glaze in: {}", root.display());

    // 1. glaze.yaml
    let config_path = paths::config_path(root);
    if config_path.exists() {
        println!("  exists:  {}", paths::CONFIG_FILE);
    } else {
        Config::default()
            .save(root)
            .with_context(|| format!("failed to write {}", paths::CONFIG_FILE))?;
        println!("  created: {}", paths::CONFIG_FILE);
    }

    // 2. Manifest skeleton
    if with_manifest {
        let manifest_path = paths::manifest_path(root);
        let written = io::write_if_missing(&manifest_path, MANIFEST_SKELETON.as_bytes())
            .with_context(|| format!("failed to write {}", paths::MANIFEST_FILE))?;
        if written {
            println!("  created: {}", paths::MANIFEST_FILE);
        } else {
            println!("  exists:  {}", paths::MANIFEST_FILE);
        }
    }

    // 3. Point at the template directory
    let config = Config::load(root).context("failed to load config")?;
    let templates = config.templates_dir(root);
    if !templates.is_dir() {
        println!(
            "\nnote: template directory {} does not exist yet (templates.dir)",
            templates.display()
        );
    }

    println!("\nglaze initialized.");
    println!("Next: glaze audit, then glaze patch");
    Ok(())
}
