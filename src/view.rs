use minijinja::context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::InventoryError,
    item::{Field, Item},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct ColumnView {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CellView<'a> {
    pub key: &'static str,
    pub value: &'a str,
}

/// One table row as the template sees it.
#[derive(Debug, Serialize)]
pub struct RowView<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub status: &'static str,
    pub cells: Vec<CellView<'a>>,
    pub image_path: &'a str,
    pub image_src: String,
}

impl<'a> From<&'a Item> for RowView<'a> {
    fn from(item: &'a Item) -> Self {
        Self {
            id: &item.id,
            name: &item.name,
            status: item.status().as_str(),
            cells: Field::ALL
                .iter()
                .map(|field| CellView {
                    key: field.key(),
                    value: item.field(*field),
                })
                .collect(),
            image_path: &item.image_path,
            image_src: image_src(&item.image_path),
        }
    }
}

/// Stored paths are relative to the server root; absolute URLs pass through.
pub fn image_src(image_path: &str) -> String {
    if image_path.is_empty()
        || image_path.starts_with('/')
        || image_path.starts_with("http://")
        || image_path.starts_with("https://")
    {
        image_path.to_string()
    } else {
        format!("/{image_path}")
    }
}

pub fn columns() -> Vec<ColumnView> {
    Field::ALL
        .iter()
        .map(|field| ColumnView {
            key: field.key(),
            label: field.label(),
        })
        .collect()
}

/// Renders the list page for the given stored records.
///
/// The records are also embedded as JSON, as stored; the page script takes them
/// over as its working copy. Records that are not objects get no table row.
pub fn render_index(state: &AppState, records: &[Value]) -> Result<String, InventoryError> {
    let items: Vec<Item> = records
        .iter()
        .filter_map(|record| match Item::deserialize(record) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!("Not rendering record {record}: {e}");
                None
            }
        })
        .collect();
    let rows: Vec<RowView> = items.iter().map(RowView::from).collect();
    let template = state.views.get_template("index.html")?;

    Ok(template.render(context! {
        title => state.title.as_ref(),
        columns => columns(),
        rows => rows,
        items_json => serde_json::to_string(records)?,
    })?)
}
