use crate::{
    dom::{ANIMATED_TAGS, Document, SMIL_TAGS},
    model::{AnimationKind, AnimationSettings, StaggerStyle},
    strategy, timing,
};

/// Project the timing model onto CSS keyframe rules and bundle everything
/// into one standalone HTML document.
///
/// Rule bodies are fixed per family and parameterized only by duration,
/// delay, color and width; per-element variation travels through custom
/// properties so the sheet itself stays element-count independent.
pub fn export_html(animated: &Document, settings: &AnimationSettings) -> String {
    let css = stylesheet(settings);
    let svg = markup(animated, settings);
    let cycle_ms = settings.cycle_seconds() * 1000.0;

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>SVG Animation</title>
    <style>
{css}
    </style>
</head>
<body>
    <div class="svg-container">
        {svg}
    </div>

    <script>
        // Restart animation
        function restartAnimation() {{
            const svg = document.querySelector('svg');
            const animatedElements = svg.querySelectorAll('.animated-element');
            animatedElements.forEach(el => {{
                el.style.animation = 'none';
                el.offsetHeight; // Trigger reflow
                el.style.animation = null;
            }});
        }}

        // Auto-restart every {cycle} seconds
        setInterval(restartAnimation, {cycle_ms});
    </script>
</body>
</html>"#,
        css = css,
        svg = svg,
        cycle = settings.cycle_seconds(),
        cycle_ms = cycle_ms,
    )
}

/// The full style sheet: shared container/base rules plus the active
/// family's rule pair.
pub fn stylesheet(settings: &AnimationSettings) -> String {
    format!("{BASE_RULES}\n{}", family_rules(settings))
}

const BASE_RULES: &str = r#"        .svg-container {
            display: flex;
            justify-content: center;
            align-items: center;
            min-height: 100vh;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
        }

        svg {
            max-width: 100%;
            max-height: 80vh;
            filter: drop-shadow(0 10px 20px rgba(0,0,0,0.2));
        }

        .animated-element {
            animation-fill-mode: both;
            animation-timing-function: ease-out;
        }"#;

fn family_rules(settings: &AnimationSettings) -> String {
    let duration = settings.duration;
    let delay = settings.delay;

    match settings.kind {
        AnimationKind::Stroke => format!(
            r#"        .animated-element {{
            stroke: {color};
            stroke-width: {width};
            fill: none;
            stroke-linecap: {cap};
            stroke-linejoin: {join};
            animation: drawStroke {duration}s ease-out {delay}s both;
        }}

        @keyframes drawStroke {{
            0% {{
                stroke-dasharray: 1000;
                stroke-dashoffset: 1000;
            }}
            100% {{
                stroke-dasharray: 1000;
                stroke-dashoffset: 0;
            }}
        }}"#,
            color = settings.stroke_color,
            width = settings.stroke_width,
            cap = settings.linecap.as_str(),
            join = settings.linecap.linejoin(),
        ),
        AnimationKind::Typewriter => format!(
            r#"        .animated-element {{
            opacity: 0;
            animation: typewriter 0.3s ease-out var(--animation-delay, {delay}s) both;
        }}

        @keyframes typewriter {{
            0% {{ opacity: 0; }}
            70% {{ opacity: 0; }}
            100% {{ opacity: 1; }}
        }}"#
        ),
        AnimationKind::Fade => format!(
            r#"        .animated-element {{
            opacity: 0;
            animation: fadeIn {duration}s ease-out var(--animation-delay, {delay}s) both;
        }}

        @keyframes fadeIn {{
            0% {{ opacity: 0; }}
            100% {{ opacity: 1; }}
        }}"#
        ),
        AnimationKind::Scale => format!(
            r#"        .animated-element {{
            transform: scale(0);
            animation: scaleIn {duration}s ease-out var(--animation-delay, {delay}s) both;
        }}

        @keyframes scaleIn {{
            0% {{ transform: scale(0); }}
            60% {{ transform: scale(1.2); }}
            100% {{ transform: scale(1); }}
        }}"#
        ),
        AnimationKind::Slide => format!(
            r#"        .animated-element {{
            transform: translateX(-100px);
            animation: slideIn {duration}s ease-out var(--animation-delay, {delay}s) both;
        }}

        @keyframes slideIn {{
            0% {{ transform: translateX(-100px); }}
            100% {{ transform: translateX(0); }}
        }}"#
        ),
        AnimationKind::Bounce => format!(
            r#"        .animated-element {{
            transform: translateY(-50px);
            animation: bounceIn {duration}s ease-out var(--animation-delay, {delay}s) both;
        }}

        @keyframes bounceIn {{
            0% {{ transform: translateY(-50px); }}
            50% {{ transform: translateY(10px); }}
            80% {{ transform: translateY(-5px); }}
            100% {{ transform: translateY(0); }}
        }}"#
        ),
        AnimationKind::Rotate => format!(
            r#"        .animated-element {{
            transform: rotate(360deg);
            animation: rotateIn {duration}s ease-out var(--animation-delay, {delay}s) both;
        }}

        @keyframes rotateIn {{
            0% {{ transform: rotate(360deg); }}
            100% {{ transform: rotate(0deg); }}
        }}"#
        ),
        AnimationKind::Spread => format!(
            r#"        .animated-element {{
            animation: spreadIn {duration}s ease-out var(--animation-delay, {delay}s) both;
        }}

        @keyframes spreadIn {{
            0% {{
                transform: translate(var(--spread-x, 100px), var(--spread-y, 100px));
                opacity: 0;
            }}
            100% {{
                transform: translate(0, 0);
                opacity: 1;
            }}
        }}"#
        ),
    }
}

/// The SVG markup for the standalone document: SMIL annotations are
/// stripped (the two renderers are mutually exclusive on an element) and
/// every animated element gets the shared class plus its per-element
/// custom properties.
pub fn markup(animated: &Document, settings: &AnimationSettings) -> String {
    let mut doc = animated.clone();
    let count = doc.count_tags(ANIMATED_TAGS);

    doc.visit_tags_mut(ANIMATED_TAGS, &mut |index, el| {
        el.remove_child_tags(SMIL_TAGS);
        el.add_class("animated-element");

        if settings.style == StaggerStyle::Sequential
            || settings.kind == AnimationKind::Typewriter
        {
            let start = timing::schedule(index, count, settings).start;
            el.append_style_property("--animation-delay", &format!("{start}s"));
        }

        if settings.kind == AnimationKind::Spread {
            let (dx, dy) = strategy::spread_offset(index, count);
            el.append_style_property("--spread-x", &format!("{dx}px"));
            el.append_style_property("--spread-y", &format!("{dy}px"));
        }
    });

    doc.to_svg_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::PathEstimator, normalize::normalize_document, render_smil};

    fn animated(svg: &str, settings: &AnimationSettings) -> Document {
        let doc = normalize_document(&Document::parse(svg).unwrap());
        render_smil::synthesize(&doc, settings, &PathEstimator).unwrap()
    }

    #[test]
    fn every_family_names_its_keyframes() {
        let names = [
            (AnimationKind::Stroke, "drawStroke"),
            (AnimationKind::Typewriter, "typewriter"),
            (AnimationKind::Fade, "fadeIn"),
            (AnimationKind::Scale, "scaleIn"),
            (AnimationKind::Slide, "slideIn"),
            (AnimationKind::Bounce, "bounceIn"),
            (AnimationKind::Rotate, "rotateIn"),
            (AnimationKind::Spread, "spreadIn"),
        ];
        for (kind, name) in names {
            let s = AnimationSettings {
                kind,
                ..AnimationSettings::default()
            };
            let css = stylesheet(&s);
            assert!(css.contains(&format!("@keyframes {name}")), "{name}");
            assert!(css.contains("animation-fill-mode: both"));
        }
    }

    #[test]
    fn stroke_rule_carries_settings_values() {
        let s = AnimationSettings {
            duration: 3.0,
            delay: 0.5,
            stroke_width: 4.0,
            stroke_color: "#ff0000".to_string(),
            ..AnimationSettings::default()
        };
        let css = stylesheet(&s);
        assert!(css.contains("stroke: #ff0000;"));
        assert!(css.contains("stroke-width: 4;"));
        assert!(css.contains("animation: drawStroke 3s ease-out 0.5s both;"));
    }

    #[test]
    fn markup_strips_smil_and_adds_class() {
        let s = AnimationSettings::default();
        let doc = animated(r#"<svg><line x1="0" y1="0" x2="10" y2="0"/></svg>"#, &s);
        let svg = markup(&doc, &s);
        assert!(!svg.contains("<animate"));
        assert!(svg.contains("animated-path animated-element"));
    }

    #[test]
    fn sequential_markup_gets_per_element_delays() {
        let s = AnimationSettings {
            kind: AnimationKind::Fade,
            style: StaggerStyle::Sequential,
            delay: 1.0,
            ..AnimationSettings::default()
        };
        let doc = animated(r#"<svg><line x2="1"/><line x2="2"/></svg>"#, &s);
        let svg = markup(&doc, &s);
        assert!(svg.contains("--animation-delay: 1s;"));
        assert!(svg.contains("--animation-delay: 1.2s;"));
    }

    #[test]
    fn typewriter_markup_is_sequential_even_when_simultaneous() {
        let s = AnimationSettings {
            kind: AnimationKind::Typewriter,
            style: StaggerStyle::Simultaneous,
            ..AnimationSettings::default()
        };
        let doc = animated(r#"<svg><line x2="1"/><line x2="2"/></svg>"#, &s);
        let svg = markup(&doc, &s);
        assert!(svg.contains("--animation-delay: 0s;"));
        assert!(svg.contains("--animation-delay: 0.2s;"));
    }

    #[test]
    fn spread_markup_gets_displacement_vectors() {
        let s = AnimationSettings {
            kind: AnimationKind::Spread,
            ..AnimationSettings::default()
        };
        let doc = animated(r#"<svg><line x2="1"/></svg>"#, &s);
        let svg = markup(&doc, &s);
        assert!(svg.contains("--spread-x: 100px;"));
        assert!(svg.contains("--spread-y: 0px;"));
    }

    #[test]
    fn html_document_restarts_on_the_full_cycle() {
        let s = AnimationSettings {
            duration: 2.0,
            delay: 1.0,
            ..AnimationSettings::default()
        };
        let doc = animated(r#"<svg><line x2="1"/></svg>"#, &s);
        let html = export_html(&doc, &s);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("setInterval(restartAnimation, 4000)"));
        assert!(html.contains("<style>"));
        assert!(html.contains("</svg>"));
    }
}
