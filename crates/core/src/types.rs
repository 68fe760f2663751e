/// Catalog identifiers are the stable string ids from the compiled-in tables.
pub type EntryId = String;

/// A generated image encoded as a `data:<mime>;base64,<payload>` URI.
pub type ImagePayload = String;
