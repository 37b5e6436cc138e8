pub mod svg;
pub mod metadata;
pub mod publisher;

pub use svg::{render_badge_svg, style_for_name, svg_data_uri};
pub use metadata::{BadgeMetadata, MetadataAttribute, MetadataDocument};
pub use publisher::{MetadataPublisher, PinataPublisher};
