//! Catalog directory I/O: one product per `*.json` file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use pugnare_core::Product;
use tracing::info;

/// Read every `*.json` file in `dir`, in file-name order.
pub fn load_catalog(dir: &Path) -> anyhow::Result<Vec<Product>> {
    let mut files: Vec<PathBuf> = Vec::new();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed reading catalog directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed reading {}", dir.display()))?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.len() > ".json".len() && name.ends_with(".json") {
            files.push(entry.path());
        }
    }
    files.sort();
    info!(count = files.len(), dir = %dir.display(), "found catalog files");

    let mut products = Vec::with_capacity(files.len());
    for path in &files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed reading file {}", path.display()))?;
        let product: Product = serde_json::from_str(&content)
            .with_context(|| format!("failed parsing JSON in file {}", path.display()))?;
        products.push(product);
    }
    Ok(products)
}

/// Stable sort by `display_order`; products without one go last.
pub fn sort_for_display(products: &mut [Product]) {
    products.sort_by_key(|p| (p.display_order.is_none(), p.display_order));
}

/// Write the catalog as pretty JSON to `output`, or stdout when `None`.
pub fn write_catalog(products: &[Product], output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(products).context("failed serialising catalog")?;
    match output {
        Some(path) => {
            fs::write(path, json + "\n")
                .with_context(|| format!("failed writing {}", path.display()))?;
            info!(path = %path.display(), count = products.len(), "wrote catalog");
        }
        None => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{json}").context("failed writing catalog to stdout")?;
        }
    }
    Ok(())
}
