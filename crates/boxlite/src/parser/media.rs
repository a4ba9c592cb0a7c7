//! Media parsing module, handling embedded image references.

use serde_json::Value;

use crate::assets::AssetRef;
use crate::ir::ImageBlock;

use super::core::{attr_str, attr_u32};

/// Media node parser.
pub struct MediaParser;

impl MediaParser {
    /// Convert an `image` node into an unresolved asset reference.
    ///
    /// Returns `None` when the node carries no file identifier; such a
    /// node cannot be resolved and is passed through instead.
    pub fn convert_image(node: &Value) -> Option<ImageBlock> {
        let id = attr_str(node, "boxFileId")
            .or_else(|| attr_str(node, "fileId"))
            .or_else(|| attr_str(node, "id"))
            .filter(|id| !id.is_empty())?;

        let file_name = attr_str(node, "fileName").unwrap_or_default();
        let alt = attr_str(node, "altText")
            .or_else(|| attr_str(node, "alt"))
            .unwrap_or(file_name);

        Some(ImageBlock {
            asset: AssetRef::new(id, file_name),
            width: attr_u32(node, "width"),
            height: attr_u32(node, "height"),
            alt: alt.into(),
        })
    }
}
