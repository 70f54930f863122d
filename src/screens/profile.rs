use tracing::info;

use super::{AsyncOp, ScreenScope};
use crate::auth::Session;
use crate::models::{BillingInterval, SubscriptionTier};
use crate::state::AppState;
use crate::ui::{Notice, Route};

pub fn subscription_catalog() -> Vec<SubscriptionTier> {
    fn tier(
        id: &str,
        name: &str,
        price: f64,
        interval: BillingInterval,
        features: &[&str],
        popular: bool,
    ) -> SubscriptionTier {
        SubscriptionTier {
            id: id.into(),
            name: name.into(),
            price,
            interval,
            features: features.iter().map(|f| f.to_string()).collect(),
            popular,
        }
    }
    vec![
        tier(
            "basic",
            "Basic",
            0.0,
            BillingInterval::Free,
            &[
                "Basic food logging",
                "Simple progress tracking",
                "Limited AI coach responses",
            ],
            false,
        ),
        tier(
            "premium",
            "Premium",
            9.99,
            BillingInterval::Monthly,
            &[
                "Advanced AI analysis",
                "Unlimited coach conversations",
                "Body scan comparisons",
                "Custom meal planning",
                "Priority support",
            ],
            true,
        ),
        tier(
            "premium-yearly",
            "Premium Yearly",
            99.99,
            BillingInterval::Yearly,
            &[
                "All Premium features",
                "2 months free",
                "Advanced analytics",
                "Personalized coaching",
            ],
            false,
        ),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierView {
    pub tier: SubscriptionTier,
    pub current: bool,
    /// `None` for the current tier.
    pub action: Option<&'static str>,
}

impl TierView {
    pub fn price_label(&self) -> String {
        match self.tier.interval {
            BillingInterval::Free => format!("${}", self.tier.price),
            BillingInterval::Monthly => format!("${}/monthly", self.tier.price),
            BillingInterval::Yearly => format!("${}/yearly", self.tier.price),
        }
    }
}

pub const PROFILE_STATS: [(&str, &str); 4] = [
    ("Days Active", "23"),
    ("Foods Logged", "156"),
    ("Workouts", "18"),
    ("Streak", "7"),
];

pub struct ProfileScreen {
    session: Session,
    scope: ScreenScope,
    catalog: Vec<SubscriptionTier>,
    confirming_logout: bool,
    logout: AsyncOp<()>,
    notice: Option<Notice>,
    redirect: Option<Route>,
}

impl ProfileScreen {
    pub fn new(state: &AppState) -> Self {
        Self {
            session: state.session.clone(),
            scope: ScreenScope::new(),
            catalog: subscription_catalog(),
            confirming_logout: false,
            logout: AsyncOp::Idle,
            notice: None,
            redirect: None,
        }
    }

    pub fn is_premium(&self) -> bool {
        self.session
            .current_user()
            .map(|u| u.is_premium)
            .unwrap_or(false)
    }

    pub fn badge(&self) -> &'static str {
        if self.is_premium() {
            "Premium"
        } else {
            "Basic"
        }
    }

    pub fn tiers(&self) -> Vec<TierView> {
        let premium = self.is_premium();
        self.catalog
            .iter()
            .map(|t| {
                let current = match t.id.as_str() {
                    "basic" => !premium,
                    "premium" => premium,
                    _ => false,
                };
                let action = match (current, t.price > 0.0) {
                    (true, _) => None,
                    (false, true) => Some("Upgrade"),
                    (false, false) => Some("Downgrade"),
                };
                TierView {
                    tier: t.clone(),
                    current,
                    action,
                }
            })
            .collect()
    }

    pub fn choose_tier(&mut self, id: &str) {
        let Some(view) = self.tiers().into_iter().find(|v| v.tier.id == id) else {
            return;
        };
        if !view.current && view.tier.price > 0.0 {
            self.notice = Some(Notice::info(
                "Upgrade",
                "Subscription management coming soon!",
            ));
        }
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn redirect(&self) -> Option<Route> {
        self.redirect
    }

    pub fn is_loading(&self) -> bool {
        self.logout.is_pending()
    }

    pub fn is_confirming_logout(&self) -> bool {
        self.confirming_logout
    }

    pub fn request_logout(&mut self) {
        self.confirming_logout = true;
    }

    pub fn cancel_logout(&mut self) {
        self.confirming_logout = false;
    }

    pub async fn confirm_logout(&mut self) {
        if !self.confirming_logout || !self.logout.begin() {
            return;
        }
        self.confirming_logout = false;
        let session = self.session.clone();
        let result = self
            .scope
            .run(async move {
                session.logout().await;
                Ok(())
            })
            .await;
        if result.is_ok() {
            info!("logged out from profile");
            self.redirect = Some(Route::Login);
        }
        self.logout.settle(result);
    }
}
