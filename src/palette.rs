//! Fixed catalog of node types that can be dragged onto the canvas.

/// MIME type under which palette drags carry the entry's type label.
pub const DRAG_MIME: &str = "application/x-workflow-node";

/// An instantiable node type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteEntry {
	/// Type label, also used as the new node's default label.
	pub node_type: &'static str,
	/// Opaque token the view layer maps to an icon.
	pub icon_ref: &'static str,
}

const ENTRIES: &[PaletteEntry] = &[
	PaletteEntry { node_type: "HTTP Request", icon_ref: "http" },
	PaletteEntry { node_type: "Schedule Trigger", icon_ref: "schedule" },
	PaletteEntry { node_type: "JavaScript", icon_ref: "code" },
	PaletteEntry { node_type: "Email", icon_ref: "email" },
	PaletteEntry { node_type: "Database", icon_ref: "storage" },
	PaletteEntry { node_type: "Function", icon_ref: "functions" },
	PaletteEntry { node_type: "API", icon_ref: "cloud" },
];

/// Compiled-in, read-only palette.
pub struct PaletteSource;

impl PaletteSource {
	/// All entries in display order.
	pub fn list() -> &'static [PaletteEntry] {
		ENTRIES
	}

	/// Look up an entry by its type label.
	pub fn find(node_type: &str) -> Option<&'static PaletteEntry> {
		ENTRIES.iter().find(|e| e.node_type == node_type)
	}
}

/// Payload of a drop onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPayload {
	/// Reference to a palette entry.
	PaletteEntry(&'static PaletteEntry),
}

impl DragPayload {
	/// Interpret the raw drag data. Missing data or a type the palette does
	/// not know yields `None`.
	pub fn parse(raw: Option<&str>) -> Option<Self> {
		let raw = raw?.trim();
		if raw.is_empty() {
			return None;
		}
		PaletteSource::find(raw).map(DragPayload::PaletteEntry)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn palette_is_ordered_and_unique() {
		let types: Vec<_> = PaletteSource::list().iter().map(|e| e.node_type).collect();
		assert_eq!(types.first(), Some(&"HTTP Request"));
		assert_eq!(types.len(), 7);
		let mut deduped = types.clone();
		deduped.sort();
		deduped.dedup();
		assert_eq!(deduped.len(), types.len());
	}

	#[test]
	fn known_type_parses_to_payload() {
		let payload = DragPayload::parse(Some("Email")).unwrap();
		let DragPayload::PaletteEntry(entry) = payload;
		assert_eq!(entry.icon_ref, "email");
	}

	#[test]
	fn missing_or_unknown_payload_is_rejected() {
		assert_eq!(DragPayload::parse(None), None);
		assert_eq!(DragPayload::parse(Some("")), None);
		assert_eq!(DragPayload::parse(Some("Teleporter")), None);
	}
}
