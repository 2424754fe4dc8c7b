use super::{escape, palette::Palette};
use crate::aggregate::CategoryCount;

const WIDTH: f64 = 720.0;
const MARGIN_TOP: f64 = 48.0;
const MARGIN_RIGHT: f64 = 32.0;
const MARGIN_BOTTOM: f64 = 56.0;
/// Room for category labels to the left of horizontal bars.
const LABEL_GUTTER: f64 = 200.0;
const ROW_HEIGHT: f64 = 28.0;
const PLOT_HEIGHT_VERTICAL: f64 = 320.0;
const FONT: &str = "font-family=\"sans-serif\"";

/// Which axis the bars grow along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Categories down the side, counts along the bottom.
    Horizontal,
    /// Categories along the bottom, counts up the side.
    Vertical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub value_label: String,
    pub category_label: String,
    pub orientation: Orientation,
    pub palette: Palette,
    pub bars: Vec<CategoryCount>,
}

/// A round step giving roughly five ticks up to `max`.
pub fn tick_step(max: usize) -> usize {
    if max <= 5 {
        return 1;
    }
    let raw = max as f64 / 5.0;
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);
    step.round() as usize
}

fn axis_max(bars: &[CategoryCount]) -> usize {
    let max = bars.iter().map(|b| b.count).max().unwrap_or(0);
    let step = tick_step(max);
    max.div_ceil(step).max(1) * step
}

impl BarChart {
    pub fn to_svg(&self) -> String {
        match self.orientation {
            Orientation::Horizontal => self.horizontal_svg(),
            Orientation::Vertical => self.vertical_svg(),
        }
    }

    fn header(&self, height: f64) -> String {
        let mut s = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = WIDTH,
            h = height
        );
        s.push_str(&format!(
            "<text x=\"{}\" y=\"24\" text-anchor=\"middle\" font-size=\"16\" font-weight=\"bold\" {}>{}</text>\n",
            WIDTH / 2.0,
            FONT,
            escape(&self.title)
        ));
        s
    }

    fn horizontal_svg(&self) -> String {
        let n = self.bars.len() as f64;
        let plot_h = (n * ROW_HEIGHT).max(ROW_HEIGHT);
        let height = MARGIN_TOP + plot_h + MARGIN_BOTTOM;
        let plot_w = WIDTH - LABEL_GUTTER - MARGIN_RIGHT;
        let max = axis_max(&self.bars);
        let scale = plot_w / max as f64;
        let colours = self.palette.sample(self.bars.len());

        let mut s = self.header(height);
        for (i, (bar, colour)) in self.bars.iter().zip(&colours).enumerate() {
            let y = MARGIN_TOP + i as f64 * ROW_HEIGHT;
            s.push_str(&format!(
                "<rect x=\"{}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"><title>{}: {}</title></rect>\n",
                LABEL_GUTTER,
                y + 4.0,
                bar.count as f64 * scale,
                ROW_HEIGHT - 8.0,
                colour,
                escape(&bar.label),
                bar.count
            ));
            s.push_str(&format!(
                "<text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"12\" {}>{}</text>\n",
                LABEL_GUTTER - 6.0,
                y + ROW_HEIGHT / 2.0 + 4.0,
                FONT,
                escape(&bar.label)
            ));
        }

        let axis_y = MARGIN_TOP + plot_h;
        s.push_str(&format!(
            "<line x1=\"{x0}\" y1=\"{y}\" x2=\"{x1}\" y2=\"{y}\" stroke=\"#333\"/>\n",
            x0 = LABEL_GUTTER,
            x1 = LABEL_GUTTER + plot_w,
            y = axis_y
        ));
        let step = tick_step(max);
        for v in (0..=max).step_by(step) {
            s.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"11\" {}>{}</text>\n",
                LABEL_GUTTER + v as f64 * scale,
                axis_y + 16.0,
                FONT,
                v
            ));
        }
        s.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"13\" {}>{}</text>\n",
            LABEL_GUTTER + plot_w / 2.0,
            height - 12.0,
            FONT,
            escape(&self.value_label)
        ));
        s.push_str(&format!(
            "<text x=\"14\" y=\"{y:.1}\" text-anchor=\"middle\" font-size=\"13\" transform=\"rotate(-90 14 {y:.1})\" {f}>{t}</text>\n",
            y = MARGIN_TOP + plot_h / 2.0,
            f = FONT,
            t = escape(&self.category_label)
        ));
        s.push_str("</svg>\n");
        s
    }

    fn vertical_svg(&self) -> String {
        let left = 72.0;
        let height = MARGIN_TOP + PLOT_HEIGHT_VERTICAL + MARGIN_BOTTOM + 24.0;
        let plot_w = WIDTH - left - MARGIN_RIGHT;
        let axis_y = MARGIN_TOP + PLOT_HEIGHT_VERTICAL;
        let max = axis_max(&self.bars);
        let scale = PLOT_HEIGHT_VERTICAL / max as f64;
        let slot = plot_w / (self.bars.len().max(1)) as f64;
        let colours = self.palette.sample(self.bars.len());

        let mut s = self.header(height);
        for (i, (bar, colour)) in self.bars.iter().zip(&colours).enumerate() {
            let x = left + i as f64 * slot;
            let h = bar.count as f64 * scale;
            s.push_str(&format!(
                "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"><title>{}: {}</title></rect>\n",
                x + slot * 0.1,
                axis_y - h,
                slot * 0.8,
                h,
                colour,
                escape(&bar.label),
                bar.count
            ));
            s.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"12\" {}>{}</text>\n",
                x + slot / 2.0,
                axis_y + 16.0,
                FONT,
                escape(&bar.label)
            ));
        }

        s.push_str(&format!(
            "<line x1=\"{x}\" y1=\"{y0}\" x2=\"{x}\" y2=\"{y1}\" stroke=\"#333\"/>\n",
            x = left,
            y0 = MARGIN_TOP,
            y1 = axis_y
        ));
        let step = tick_step(max);
        for v in (0..=max).step_by(step) {
            s.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"11\" {}>{}</text>\n",
                left - 6.0,
                axis_y - v as f64 * scale + 4.0,
                FONT,
                v
            ));
        }
        s.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"13\" {}>{}</text>\n",
            left + plot_w / 2.0,
            height - 12.0,
            FONT,
            escape(&self.category_label)
        ));
        s.push_str(&format!(
            "<text x=\"16\" y=\"{y:.1}\" text-anchor=\"middle\" font-size=\"13\" transform=\"rotate(-90 16 {y:.1})\" {f}>{t}</text>\n",
            y = MARGIN_TOP + PLOT_HEIGHT_VERTICAL / 2.0,
            f = FONT,
            t = escape(&self.value_label)
        ));
        s.push_str("</svg>\n");
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(orientation: Orientation) -> BarChart {
        BarChart {
            title: "Top Payment Methods".to_string(),
            value_label: "Number of Transactions".to_string(),
            category_label: "Payment Method".to_string(),
            orientation,
            palette: Palette::Magma,
            bars: vec![
                CategoryCount::new("credit_card", 76795),
                CategoryCount::new("boleto", 19784),
                CategoryCount::new("debit<card>", 1529),
            ],
        }
    }

    #[test]
    fn test_tick_step() {
        assert_eq!(tick_step(0), 1);
        assert_eq!(tick_step(4), 1);
        assert_eq!(tick_step(12), 5);
        assert_eq!(tick_step(76795), 20000);
    }

    #[test]
    fn test_axis_max_rounds_up() {
        assert_eq!(axis_max(&[]), 1);
        assert_eq!(axis_max(&[CategoryCount::new("a", 76795)]), 80000);
        assert_eq!(axis_max(&[CategoryCount::new("a", 3)]), 3);
    }

    #[test]
    fn test_horizontal_svg() {
        let svg = chart(Orientation::Horizontal).to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<rect").count(), 3);
        assert!(svg.contains("Top Payment Methods"));
        assert!(svg.contains("Number of Transactions"));
        assert!(svg.contains("debit&lt;card&gt;"));
        assert!(!svg.contains("debit<card>"));
    }

    #[test]
    fn test_vertical_svg() {
        let svg = chart(Orientation::Vertical).to_svg();
        assert_eq!(svg.matches("<rect").count(), 3);
        assert!(svg.contains("Payment Method"));
    }
}
