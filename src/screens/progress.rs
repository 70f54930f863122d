use time::macros::date;
use time::Date;

const CHART_INSET: f64 = 80.0;
const CHART_HEIGHT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
}

impl Period {
    pub const ALL: [Period; 2] = [Period::Week, Period::Month];

    pub fn label(self) -> &'static str {
        match self {
            Period::Week => "Week",
            Period::Month => "Month",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub weight: Vec<f64>,
    pub calories: Vec<f64>,
    pub workouts: Vec<u32>,
}

pub fn series(period: Period) -> Series {
    match period {
        Period::Week => Series {
            weight: vec![70.5, 70.2, 70.0, 69.8, 69.5, 69.3, 69.1],
            calories: vec![2200.0, 2150.0, 2300.0, 2100.0, 2250.0, 2180.0, 2200.0],
            workouts: vec![1, 0, 1, 1, 0, 1, 1],
        },
        Period::Month => Series {
            weight: vec![71.0, 70.5, 70.2, 69.8, 69.5, 69.3, 69.1, 68.9],
            calories: vec![2180.0, 2200.0, 2150.0, 2100.0, 2250.0, 2180.0, 2200.0, 2150.0],
            workouts: vec![5, 4, 6, 5, 4, 5, 5, 6],
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

/// Places weights across `width`; a flat series sits at mid-height.
pub fn chart_points(weights: &[f64], width: f64) -> Vec<ChartPoint> {
    let min = weights.iter().copied().fold(f64::INFINITY, f64::min);
    let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let last = weights.len().saturating_sub(1);
    weights
        .iter()
        .enumerate()
        .map(|(i, w)| ChartPoint {
            x: if last == 0 {
                0.0
            } else {
                i as f64 / last as f64 * width
            },
            y: if range > 0.0 {
                (w - min) / range * CHART_HEIGHT
            } else {
                CHART_HEIGHT / 2.0
            },
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuickStats {
    pub weight_change: f64,
    pub average_calories: f64,
    pub workouts: u32,
}

pub fn quick_stats(s: &Series) -> QuickStats {
    let weight_change = match (s.weight.first(), s.weight.last()) {
        (Some(first), Some(last)) => last - first,
        _ => 0.0,
    };
    let average_calories = if s.calories.is_empty() {
        0.0
    } else {
        s.calories.iter().sum::<f64>() / s.calories.len() as f64
    };
    QuickStats {
        weight_change,
        average_calories,
        workouts: s.workouts.iter().sum(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanSummary {
    pub id: &'static str,
    pub date: Date,
    pub body_fat: f64,
    pub muscle_mass: f64,
    pub changes: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub completed: bool,
    pub progress: Option<(u32, u32)>,
}

impl Achievement {
    /// Completion percent for achievements still in progress.
    pub fn percent(&self) -> Option<f64> {
        match self.progress {
            Some((done, target)) if !self.completed && target > 0 => {
                Some(f64::from(done) / f64::from(target) * 100.0)
            }
            _ => None,
        }
    }
}

pub fn body_scans() -> Vec<ScanSummary> {
    vec![
        ScanSummary {
            id: "1",
            date: date!(2024 - 01 - 01),
            body_fat: 15.2,
            muscle_mass: 42.5,
            changes: "Lost 2.3% body fat",
        },
        ScanSummary {
            id: "2",
            date: date!(2024 - 01 - 15),
            body_fat: 14.8,
            muscle_mass: 43.1,
            changes: "Gained 0.6kg muscle",
        },
    ]
}

pub fn achievements() -> Vec<Achievement> {
    vec![
        Achievement {
            id: "1",
            title: "7 Day Streak",
            description: "Logged food for 7 consecutive days",
            icon: "🔥",
            completed: true,
            progress: None,
        },
        Achievement {
            id: "2",
            title: "Protein Goal",
            description: "Hit protein target 5 days this week",
            icon: "💪",
            completed: true,
            progress: None,
        },
        Achievement {
            id: "3",
            title: "Workout Warrior",
            description: "Complete 10 workouts this month",
            icon: "🏋️",
            completed: false,
            progress: Some((7, 10)),
        },
    ]
}

pub struct ProgressScreen {
    period: Period,
    chart_width: f64,
}

impl ProgressScreen {
    pub fn new(screen_width: f64) -> Self {
        Self {
            period: Period::Week,
            chart_width: (screen_width - CHART_INSET).max(0.0),
        }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn select_period(&mut self, period: Period) {
        self.period = period;
    }

    pub fn chart(&self) -> Vec<ChartPoint> {
        chart_points(&series(self.period).weight, self.chart_width)
    }

    pub fn quick_stats(&self) -> QuickStats {
        quick_stats(&series(self.period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_chart_spans_width_and_height() {
        let screen = ProgressScreen::new(380.0);
        let pts = screen.chart();
        assert_eq!(pts.len(), 7);
        assert_eq!(pts[0].x, 0.0);
        assert_eq!(pts[6].x, 300.0);
        assert_eq!(pts[0].y, 100.0);
        assert_eq!(pts[6].y, 0.0);
    }

    #[test]
    fn flat_series_sits_mid_height() {
        let pts = chart_points(&[70.0, 70.0, 70.0], 200.0);
        assert!(pts.iter().all(|p| p.y == 50.0));
        assert_eq!(pts[1].x, 100.0);
    }

    #[test]
    fn single_point_and_empty() {
        assert_eq!(chart_points(&[70.0], 200.0), vec![ChartPoint { x: 0.0, y: 50.0 }]);
        assert!(chart_points(&[], 200.0).is_empty());
    }

    #[test]
    fn switching_period_changes_series() {
        let mut screen = ProgressScreen::new(380.0);
        screen.select_period(Period::Month);
        assert_eq!(screen.chart().len(), 8);
        let stats = screen.quick_stats();
        assert!((stats.weight_change + 2.1).abs() < 1e-9);
        assert_eq!(stats.workouts, 40);
    }

    #[test]
    fn only_open_achievements_report_percent() {
        let a = achievements();
        assert_eq!(a[0].percent(), None);
        assert_eq!(a[2].percent(), Some(70.0));
        assert_eq!(body_scans().len(), 2);
    }
}
