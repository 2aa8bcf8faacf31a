use std::path::Path;

use plotters::{
    prelude::{BitMapBackend, IntoDrawingArea},
    series::{AreaSeries, LineSeries},
    style::{Color, BLUE, GREEN, RED, WHITE},
};

use crate::types::Data;

fn bounds(data: &[f64]) -> (f32, f32) {
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    (min as f32, max as f32)
}

pub fn simple_chart(dir: &Path, name: &str, data: &Data) -> Result<(), Box<dyn std::error::Error>> {
    let path = dir.join(format!("{name}.png"));
    let root = BitMapBackend::new(&path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let (y_min, y_max) = bounds(data);
    let padding = ((y_max - y_min) * 0.1).max(1.0);

    let mut chart = plotters::chart::ChartBuilder::on(&root)
        .caption(name, ("sans-serif", 20))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0..data.len() as u32, (y_min - padding)..(y_max + padding))?;

    chart.configure_mesh().light_line_style(WHITE).draw()?;

    chart.draw_series(LineSeries::new(
        data.iter()
            .enumerate()
            .map(|(index, value)| (index as u32, *value as f32)),
        &BLUE,
    ))?;

    root.present()?;

    Ok(())
}

/// Net worth split into cash and positioned value
pub fn assets_chart(dir: &Path, net_worth: &Data, balance: &Data) -> Result<(), Box<dyn std::error::Error>> {
    let path = dir.join("assets.png");
    let root = BitMapBackend::new(&path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let (_, y_max) = bounds(net_worth);

    let mut chart = plotters::chart::ChartBuilder::on(&root)
        .caption("Assets: Net Worth; Positioned; Cash", ("sans-serif", 20))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0..net_worth.len() as u32, 0.0..(y_max * 1.1).max(1.0))?;

    chart.configure_mesh().light_line_style(WHITE).draw()?;

    chart.draw_series(
        AreaSeries::new(
            net_worth
                .iter()
                .enumerate()
                .map(|(index, value)| (index as u32, *value as f32)),
            0.0,
            BLUE.mix(0.2),
        )
        .border_style(BLUE),
    )?;

    let positioned = net_worth
        .iter()
        .zip(balance)
        .map(|(net_worth, cash)| net_worth - cash)
        .collect::<Data>();

    chart.draw_series(
        AreaSeries::new(
            positioned
                .iter()
                .enumerate()
                .map(|(index, value)| (index as u32, *value as f32)),
            0.0,
            RED.mix(0.2),
        )
        .border_style(RED),
    )?;

    chart.draw_series(
        AreaSeries::new(
            balance
                .iter()
                .enumerate()
                .map(|(index, value)| (index as u32, *value as f32)),
            0.0,
            GREEN.mix(0.2),
        )
        .border_style(GREEN),
    )?;

    root.present()?;

    Ok(())
}
