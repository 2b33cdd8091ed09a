use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::drivers::error::ScopeError;
use crate::drivers::metrics::adc_to_volts;
use crate::types::ScopeFrame;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub trace: RGBColor,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 400,
            background: RGBColor(10, 10, 20),
            trace: RGBColor(0, 200, 0),
        }
    }
}
/// Renders the frame's trace, in volts against sample index, as a PNG.
pub fn render_waveform_png(frame: &ScopeFrame, style: PlotStyle) -> Result<Vec<u8>, ScopeError> {
    if frame.samples.is_empty() {
        return Err(ScopeError::Plot("scope frame has no samples".into()));
    }
    let m = &frame.measurements;
    let caption = format!(
        "{}  Vpp {:.3} V  Vavg {:.3} V  f {:.2} Hz  [{}]",
        frame.timebase.label(),
        m.v_pp,
        m.v_avg,
        m.freq_hz,
        frame.state.label()
    );
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(caption, ("sans-serif", 18).into_font().color(&WHITE))
            .set_label_area_size(LabelAreaPosition::Left, 45)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(0f64..frame.samples.len() as f64, 0f64..frame.vref)?;
        chart
            .configure_mesh()
            .x_labels(10)
            .y_labels(8)
            .light_line_style(&WHITE.mix(0.1))
            .y_desc("V")
            .draw()?;
        let series = frame
            .samples
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as f64, adc_to_volts(v, frame.vref)));
        chart.draw_series(LineSeries::new(series, &style.trace))?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ScopeError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| ScopeError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::Measurements;
    use crate::types::{AcquisitionState, Timebase};
    fn frame(samples: Vec<u8>) -> ScopeFrame {
        ScopeFrame {
            measurements: Measurements::compute(&samples, 5.0, 1000.0),
            samples,
            current: 0,
            timebase: Timebase::X1,
            state: AcquisitionState::default(),
            sample_rate_hz: 1000.0,
            vref: 5.0,
            source: "test".into(),
        }
    }
    #[test]
    fn waveform_snapshot_is_png() {
        let samples: Vec<u8> = (0..200).map(|i| (i % 256) as u8).collect();
        let png = render_waveform_png(&frame(samples), PlotStyle::default()).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
    #[test]
    fn empty_frame_is_rejected() {
        assert!(matches!(
            render_waveform_png(&frame(Vec::new()), PlotStyle::default()),
            Err(ScopeError::Plot(_))
        ));
    }
}
