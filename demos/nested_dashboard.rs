#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Nested Dashboard Example
//!
//! Builds a two-panel dashboard out of nested contexts, wires a span to the
//! bar panel, simulates a few clicks and re-renders with a transition.
//!
//! Run with: `cargo run --example nested_dashboard`

use std::rc::Rc;
use trueno_ctx::prelude::*;

fn dashboard(sales: &[f64], shift: f64) -> StandaloneContextSpec {
    let months = ["jan", "feb", "mar", "apr"];
    let bars: Vec<Datum> = months.iter().zip(sales).map(|(m, v)| Datum::xy(*m, *v)).collect();
    let trend: Vec<Datum> = (0..=20)
        .map(|i| {
            let t = f64::from(i) / 2.0;
            Datum::xy(t, (t + shift).sin() * 3.0 + 5.0)
        })
        .collect();

    let ten = Domain::continuous(0.0, 10.0);
    let bar_panel = ContextSpec::new("sales", Domain::categorical(months), ten.clone())
        .x_range(0.0, 0.48)
        .description(AttributeDescription::new().duration(400.0))
        .child(
            MarkSpec::new("months", MarkKind::Bar).data(bars).description(
                AttributeDescription::new()
                    .style("fill", Rgba::STEEL_BLUE)
                    .on("click")
                    .duration(400.0),
            ),
        );

    let line_panel = ContextSpec::new("trend", ten.clone(), ten)
        .x_range(0.52, 1.0)
        .child(
            MarkSpec::new("wave", MarkKind::Line { curve: Curve::Basis })
                .data(trend.clone())
                .description(
                    AttributeDescription::new()
                        .attr("fill", "none")
                        .attr("stroke", "black"),
                ),
        )
        .child(
            MarkSpec::new("samples", MarkKind::Shape { symbol: Symbol::Diamond })
                .data(trend.into_iter().step_by(4).collect())
                .description(AttributeDescription::new().on("mouseover")),
        );

    StandaloneContextSpec::new(
        "dashboard",
        Domain::continuous(0.0, 1.0),
        (40.0, 760.0),
        Domain::continuous(0.0, 1.0),
        (360.0, 20.0),
    )
    .child(bar_panel)
    .child(line_panel)
}

fn main() {
    tracing_subscriber::fmt::init();

    println!("Nested Dashboard Example");
    println!("========================\n");

    let mut scene = Scene::new(800, 400);
    let root = scene.root();

    // The host owns the span; marks with the same id report into it.
    let clicks = Span::new("months");
    clicks.subscribe(|span| println!("   span notified: {} clicks", span.count("click")));
    scene.register_span(Rc::clone(&clicks));

    println!("1. First render...");
    context_standalone(&mut scene, root, &dashboard(&[3.0, 7.0, 5.0, 9.0], 0.0));
    println!("   Nodes: {}\n", scene.document().len());

    println!("2. Simulating clicks on two bars...");
    let bars = scene.document().find_by_class("bar-months");
    scene.dispatch(bars[1], "click");
    scene.dispatch(bars[3], "click");
    println!("   Clicks recorded: {}\n", clicks.count("click"));

    println!("3. Re-render with new data (same ids, animated)...");
    context_standalone(&mut scene, root, &dashboard(&[4.0, 2.0, 8.0, 6.0], 1.0));
    println!("   Nodes: {} (unchanged)\n", scene.document().len());

    let path = "nested_dashboard.svg";
    SvgWriter::new()
        .background(Some(Rgba::WHITE))
        .write_to_file(scene.document(), path)
        .expect("Failed to write SVG");
    println!("   Saved: {path}");
    println!("   Span state: {}", clicks.to_json());
}
