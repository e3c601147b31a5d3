use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::gallery::GalleryItem;
use crate::ledger::Transaction;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Asset stem, resolved against the assets directory.
    pub image: String,
    pub goal: f64,
    pub raised: f64,
    pub category: String,
    pub date: String,
    pub location: String,
}

impl Campaign {
    pub fn progress_percent(&self) -> f64 {
        if self.goal <= 0.0 {
            return 0.0;
        }
        (self.raised / self.goal * 100.0).clamp(0.0, 100.0)
    }

    /// Name up to the first dash, used for compact selectors.
    pub fn short_name(&self) -> &str {
        self.name
            .split(['–', '-'])
            .next()
            .map(|s| s.trim())
            .unwrap_or(self.name.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Objective {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct CampaignData {
    pub objectives: Vec<Objective>,
    pub campaigns: Vec<Campaign>,
    pub transactions: Vec<Transaction>,
}

/// Campaigns tagged with `category`. An unknown or empty category shows every campaign.
pub fn filter_by_category<'a>(campaigns: &'a [Campaign], category: Option<&str>) -> Vec<&'a Campaign> {
    let all = || campaigns.iter().collect::<Vec<_>>();
    let Some(category) = category else {
        return all();
    };
    let filtered: Vec<&Campaign> = campaigns.iter().filter(|c| c.category == category).collect();
    if filtered.is_empty() { all() } else { filtered }
}

pub fn gallery_items(campaigns: &[&Campaign], assets_dir: &Path, extension: &str) -> Vec<GalleryItem> {
    campaigns
        .iter()
        .map(|c| GalleryItem {
            image: assets_dir.join(format!("{}.{}", c.image, extension)),
            text: c.name.clone(),
        })
        .collect()
}

/// `1234567.0` -> `"1,234,567"`. Fractions are rounded away.
pub fn format_thousands(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(id: &str, category: &str, goal: f64, raised: f64) -> Campaign {
        Campaign {
            id: id.to_string(),
            name: format!("{id} – Somewhere"),
            description: String::new(),
            image: id.to_string(),
            goal,
            raised,
            category: category.to_string(),
            date: "2025-10-25".to_string(),
            location: "Somewhere".to_string(),
        }
    }

    #[test]
    fn progress_is_clamped_and_guards_zero_goal() {
        assert!((campaign("a", "ayuda", 5_000_000.0, 3_250_000.0).progress_percent() - 65.0).abs() < 1e-9);
        assert_eq!(campaign("b", "ayuda", 0.0, 10.0).progress_percent(), 0.0);
        assert_eq!(campaign("c", "ayuda", 10.0, 50.0).progress_percent(), 100.0);
    }

    #[test]
    fn filter_falls_back_to_everything() {
        let all = vec![
            campaign("a", "ayuda", 1.0, 0.0),
            campaign("b", "reconstruccion", 1.0, 0.0),
            campaign("c", "ayuda", 1.0, 0.0),
        ];
        let ids = |v: Vec<&Campaign>| v.iter().map(|c| c.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(filter_by_category(&all, Some("ayuda"))), vec!["a", "c"]);
        assert_eq!(ids(filter_by_category(&all, Some("educacion"))), vec!["a", "b", "c"]);
        assert_eq!(ids(filter_by_category(&all, None)), vec!["a", "b", "c"]);
    }

    #[test]
    fn gallery_items_resolve_assets() {
        let all = vec![campaign("huracan", "ayuda", 1.0, 0.0)];
        let refs: Vec<&Campaign> = all.iter().collect();
        let items = gallery_items(&refs, Path::new("assets"), "jpg");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].image, Path::new("assets").join("huracan.jpg"));
        assert_eq!(items[0].text, "huracan – Somewhere");
        assert_eq!(all[0].short_name(), "huracan");
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(50_000.0), "50,000");
        assert_eq!(format_thousands(5_000_000.0), "5,000,000");
        assert_eq!(format_thousands(-1234.0), "-1,234");
    }
}
