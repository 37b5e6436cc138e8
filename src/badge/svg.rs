use base64::Engine;

use crate::models::{BadgeStyle, Category};

/// Style for a category name as stored in metadata; unknown names get a neutral badge.
pub fn style_for_name(name: &str) -> BadgeStyle {
    name.parse::<Category>().map(|c| c.style()).unwrap_or(BadgeStyle::UNKNOWN)
}

/// Render the badge artwork: a rounded frame with the tier initial over a star medal.
pub fn render_badge_svg(style: &BadgeStyle) -> String {
    let frame = style.frame_color;
    let star = style.star_color;
    let initial = style.initial;
    let star_stroke = if style.star_stroke_width > 0 {
        format!(r#" stroke="{}" stroke-width="{}""#, frame, style.star_stroke_width)
    } else {
        String::new()
    };

    format!(
        r##"<?xml version="1.0" encoding="iso-8859-1"?>
<svg version="1.1" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" x="0px" y="0px"
	 viewBox="0 0 359.676 359.676" style="enable-background:new 0 0 359.676 359.676;" xml:space="preserve">
<g id="badge">
	<g id="badge-frame">
		<path style="fill:{frame};" d="M223.919,156.497h-88.164c-17.971,0-32.592-14.621-32.592-32.592V32.592
			C103.163,14.621,117.784,0,135.755,0h88.164c17.971,0,32.592,14.621,32.592,32.592v91.313
			C256.511,141.876,241.89,156.497,223.919,156.497z M135.755,20c-6.943,0-12.592,5.648-12.592,12.592v91.313
			c0,6.943,5.648,12.592,12.592,12.592h88.164c6.943,0,12.592-5.648,12.592-12.592V32.592c0-6.943-5.648-12.592-12.592-12.592
			H135.755z"/>
	</g>
	<text x="179.8" y="80" dominant-baseline="middle" text-anchor="middle" font-family="Arial, Helvetica, sans-serif" font-size="70" font-weight="bold" fill="{frame}">{initial}</text>
	<g id="badge-ribbon">
		<rect x="169.837" y="137.91" style="fill:{frame};" width="20" height="94.091"/>
	</g>
	<g id="badge-star">
		<path style="fill:{star};"{star_stroke} d="M186.146,193.071l19.726,48.111l51.852,3.894c6.081,0.457,8.551,8.056,3.899,12
			l-39.66,33.628l12.32,50.517c1.445,5.925-5.02,10.622-10.208,7.417l-44.237-27.328l-44.239,27.327
			c-5.188,3.205-11.653-1.492-10.208-7.417l12.32-50.517l-39.66-33.628c-4.651-3.944-2.182-11.544,3.899-12l51.852-3.894
			l19.726-48.111C175.841,187.428,183.832,187.428,186.146,193.071z"/>
		<path style="fill:{frame};" d="M227.65,359.676c-3.097,0-6.15-0.875-8.832-2.531l-38.981-24.082l-38.981,24.082
			c-2.682,1.656-5.735,2.531-8.831,2.531c-5.121,0-10.083-2.425-13.272-6.485c-3.188-4.06-4.309-9.286-3.075-14.341l10.856-44.515
			l-34.949-29.633c-5.227-4.431-7.236-11.506-5.119-18.023s7.901-11.062,14.736-11.575l45.691-3.432l17.384-42.395
			c2.6-6.341,8.707-10.438,15.561-10.438s12.961,4.097,15.562,10.438l17.383,42.395l45.691,3.432
			c6.835,0.514,12.619,5.058,14.736,11.575s0.107,13.593-5.119,18.024l-34.949,29.632l10.856,44.516
			c1.233,5.054,0.112,10.28-3.075,14.339C237.732,357.251,232.77,359.676,227.65,359.676z M110.437,254.466l38.454,32.605
			l-11.945,48.979l42.892-26.496l42.892,26.496l-11.945-48.979l38.454-32.605l-50.274-3.774l-19.126-46.646l-19.126,46.646
			L110.437,254.466z"/>
	</g>
</g>
</svg>"##
    )
}

/// Base64 `data:` URI for embedding the artwork in token metadata.
pub fn svg_data_uri(svg: &str) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(svg.as_bytes())
    )
}
