//! Grid presenter: images grouped by page, selection toggling

use crate::error::{Error, Result};
use crate::session::{ImageRecord, SelectionSet, SessionStore};
use serde::Serialize;
use std::collections::BTreeMap;

/// Images of one source page, in list order
#[derive(Debug, PartialEq, Eq)]
pub struct PageGroup<'a> {
    pub page: u32,
    pub images: Vec<&'a ImageRecord>,
}

/// Partition `images` by page.
///
/// Pages come out in ascending numeric order; inside a page the records keep
/// their relative order from `images`.
pub fn group_by_page(images: &[ImageRecord]) -> Vec<PageGroup<'_>> {
    let mut pages: BTreeMap<u32, Vec<&ImageRecord>> = BTreeMap::new();
    for img in images {
        pages.entry(img.page).or_default().push(img);
    }

    pages
        .into_iter()
        .map(|(page, images)| PageGroup { page, images })
        .collect()
}

/// One image tile
#[derive(Debug, Serialize)]
pub struct TileView {
    pub name: String,
    pub page: u32,
    pub mime_type: String,
    /// Decoded size in bytes (approximate)
    pub size: usize,
    pub selected: bool,
    /// Full data URI, only when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// One page section of the grid
#[derive(Debug, Serialize)]
pub struct PageView {
    pub page: u32,
    /// e.g. "Page 3 (2 images)"
    pub heading: String,
    pub images: Vec<TileView>,
}

fn heading(page: u32, count: usize) -> String {
    let noun = if count == 1 { "image" } else { "images" };
    format!("Page {} ({} {})", page, count, noun)
}

/// Render the grouped grid for `images` and `selection`
pub fn render(images: &[ImageRecord], selection: &SelectionSet, include_data: bool) -> Vec<PageView> {
    group_by_page(images)
        .into_iter()
        .map(|group| PageView {
            page: group.page,
            heading: heading(group.page, group.images.len()),
            images: group
                .images
                .into_iter()
                .map(|img| TileView {
                    name: img.name.clone(),
                    page: img.page,
                    mime_type: img.mime_type().to_string(),
                    size: img.payload_size(),
                    selected: selection.contains(&img.name),
                    data: include_data.then(|| img.data.clone()),
                })
                .collect(),
        })
        .collect()
}

/// Grid over the shared session store
#[derive(Debug, Clone)]
pub struct GridPresenter {
    store: SessionStore,
}

impl GridPresenter {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// Current grouped view
    pub fn view(&self, include_data: bool) -> Vec<PageView> {
        self.store
            .with(|state| render(&state.images, &state.selection, include_data))
    }

    /// Flip selection of `name`. Returns whether it is selected afterwards.
    pub fn toggle(&self, name: &str) -> bool {
        let selected = self.store.toggle(name);
        tracing::debug!(name, selected, "Toggled selection");
        selected
    }

    /// Decoded bytes of the image called `name`, for a single-image download
    pub fn image_bytes(&self, name: &str) -> Result<Vec<u8>> {
        let record = self
            .store
            .with(|state| state.image(name).cloned())
            .ok_or_else(|| Error::ImageNotFound {
                name: name.to_string(),
            })?;
        record.decode()
    }
}
