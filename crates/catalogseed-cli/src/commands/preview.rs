use anyhow::Result;
use comfy_table::Table as ComfyTable;

use catalogseed_core::words::{category_of, faker_names};

use crate::args::PreviewArgs;

pub fn run(args: &PreviewArgs) -> Result<()> {
    let names = faker_names(args.seed).take_names(args.rows as usize);

    let mut t = ComfyTable::new();
    t.set_header(vec!["#", "product_name", "category"]);
    for (i, name) in names.iter().enumerate() {
        t.add_row(vec![
            (i + 1).to_string(),
            name.clone(),
            category_of(name).unwrap_or("?").to_string(),
        ]);
    }

    println!("━━━ product ({} sample rows) ━━━", names.len());
    println!("{}", t);

    Ok(())
}
