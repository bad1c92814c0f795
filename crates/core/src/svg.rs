//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use elevation_profile_protocol::{Point, RenderCommand, TextAlign, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `dark` selects the color palette.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 120);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif;font-size:10px">"#,
    ));

    let bg = resolve_color(ThemeToken::Background, dark);
    svg.push_str(&format!(
        r#"<rect width="{width}" height="{height}" fill="{bg}"/>"#,
    ));

    let mut clips = 0usize;
    let mut open_clip = false;

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
            } => {
                let fill = resolve_color(*color, dark);
                let stroke = border_color
                    .map(|c| format!(r#" stroke="{}""#, resolve_color(c, dark)))
                    .unwrap_or_default();
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}"{stroke} rx="1">"#,
                    rect.x, rect.y, rect.w, rect.h,
                ));
                if let Some(label) = label {
                    svg.push_str(&format!("<title>{}</title>", escape_xml(label)));
                }
                svg.push_str("</rect>");
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color, dark);
                svg.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                ));
            }
            RenderCommand::DrawText {
                text,
                position,
                color,
                font_size,
                align,
            } => {
                let fill = resolve_color(*color, dark);
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" fill="{fill}" font-size="{font_size}" text-anchor="{anchor}">{}</text>"#,
                    position.x,
                    position.y,
                    escape_xml(text),
                ));
            }
            RenderCommand::DrawPolyline {
                points,
                color,
                width: line_width,
                label,
            } => {
                let stroke = resolve_color(*color, dark);
                svg.push_str(&format!(
                    r#"<polyline points="{}" fill="none" stroke="{stroke}" stroke-width="{line_width}" stroke-linejoin="round" stroke-linecap="round">"#,
                    point_list(points),
                ));
                if let Some(label) = label {
                    svg.push_str(&format!("<title>{}</title>", escape_xml(label)));
                }
                svg.push_str("</polyline>");
            }
            RenderCommand::FillPolygon { points, color } => {
                let fill = resolve_color(*color, dark);
                svg.push_str(&format!(
                    r#"<polygon points="{}" fill="{fill}" fill-opacity="{}"/>"#,
                    point_list(points),
                    fill_opacity(*color),
                ));
            }
            RenderCommand::DrawCircle {
                center,
                radius,
                color,
                border_color,
            } => {
                let fill = resolve_color(*color, dark);
                let stroke = border_color
                    .map(|c| format!(r#" stroke="{}" stroke-width="1.5""#, resolve_color(c, dark)))
                    .unwrap_or_default();
                svg.push_str(&format!(
                    r#"<circle cx="{}" cy="{}" r="{radius}" fill="{fill}"{stroke}/>"#,
                    center.x, center.y,
                ));
            }
            RenderCommand::SetClip { rect } => {
                if open_clip {
                    svg.push_str("</g>");
                }
                clips += 1;
                svg.push_str(&format!(
                    r#"<clipPath id="clip-{clips}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath><g clip-path="url(#clip-{clips})">"#,
                    rect.x, rect.y, rect.w, rect.h,
                ));
                open_clip = true;
            }
            RenderCommand::ClearClip => {
                if open_clip {
                    svg.push_str("</g>");
                    open_clip = false;
                }
            }
            RenderCommand::BeginGroup { id, .. } => {
                svg.push_str(&format!(r#"<g class="{}">"#, escape_xml(id)));
            }
            RenderCommand::EndGroup => {
                if open_clip {
                    svg.push_str("</g>");
                    open_clip = false;
                }
                svg.push_str("</g>");
            }
        }
    }

    if open_clip {
        svg.push_str("</g>");
    }
    svg.push_str("</svg>");
    svg
}

fn point_list(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fill_opacity(token: ThemeToken) -> f64 {
    match token {
        ThemeToken::ProfileArea => 0.35,
        ThemeToken::SegmentBand => 0.8,
        _ => 1.0,
    }
}

fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    if dark {
        match token {
            ThemeToken::Background => "#181818",
            ThemeToken::AxisLine => "#9e9e9e",
            ThemeToken::AxisText | ThemeToken::SegmentText => "#ececec",
            ThemeToken::GridLine => "#303030",
            ThemeToken::ProfileArea => "#1e88e5",
            ThemeToken::ProfileLine => "#64b5f6",
            ThemeToken::SegmentLine => "#ffa726",
            ThemeToken::SegmentBand => "#ab47bc",
            ThemeToken::PointMarker => "#ffd600",
            ThemeToken::PointerHighlight => "#f44336",
            ThemeToken::PointerLine => "#bdbdbd",
            ThemeToken::PointerCircle => "#f44336",
        }
    } else {
        match token {
            ThemeToken::Background => "#ffffff",
            ThemeToken::AxisLine => "#666677",
            ThemeToken::AxisText | ThemeToken::SegmentText => "#1a1a2e",
            ThemeToken::GridLine => "#dee2e6",
            ThemeToken::ProfileArea => "#a8dadc",
            ThemeToken::ProfileLine => "#457b9d",
            ThemeToken::SegmentLine => "#e67e22",
            ThemeToken::SegmentBand => "#9b59b6",
            ThemeToken::PointMarker => "#e63946",
            ThemeToken::PointerHighlight => "#e63946",
            ThemeToken::PointerLine => "#adb5bd",
            ThemeToken::PointerCircle => "#e63946",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
