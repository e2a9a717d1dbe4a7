//! Industry benchmark table.
//!
//! Rates are percentages, costs and order values are dollars, spend is whole
//! dollars per week.

use super::{BenchmarkRange, CpcChannel, SpendRange};

/// Cost-per-click ranges keyed by the platform family that bills them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpcRanges {
    pub meta: BenchmarkRange,
    pub google: BenchmarkRange,
}

/// Statistical profile of one business vertical.
#[derive(Debug, Clone, Copy)]
pub struct IndustryProfile {
    /// Registry key (e.g. `"b2b_saas"`).
    pub key: &'static str,
    /// Display name used in prompts.
    pub name: &'static str,
    /// Campaign objectives this vertical runs.
    pub objectives: &'static [&'static str],
    /// Average order value; `(0, 0)` means the vertical is not revenue-bearing.
    pub order_value: BenchmarkRange,
    pub ctr: BenchmarkRange,
    pub cvr: BenchmarkRange,
    pub cpc: CpcRanges,
    pub weekly_spend: SpendRange,
    /// Narrative templates; `{name}` placeholders are filled by the composer.
    pub context_templates: &'static [&'static str],
}

impl IndustryProfile {
    pub fn cpc_for(&self, channel: CpcChannel) -> BenchmarkRange {
        match channel {
            CpcChannel::Meta => self.cpc.meta,
            CpcChannel::Google => self.cpc.google,
        }
    }

    pub fn is_revenue_bearing(&self) -> bool {
        self.order_value.hi > 0.0
    }

    pub fn conversion_kind(&self) -> ConversionKind {
        ConversionKind::for_industry_key(self.key)
    }
}

/// What a "conversion" means for a vertical, which fixes its metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionKind {
    AppInstalls,
    Transactions,
    Leads,
}

impl ConversionKind {
    /// App verticals count installs, commerce and food count transactions,
    /// everything else counts leads.
    pub fn for_industry_key(key: &str) -> Self {
        if key.contains("app") {
            ConversionKind::AppInstalls
        } else if key.contains("ecommerce") || key.contains("food") {
            ConversionKind::Transactions
        } else {
            ConversionKind::Leads
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConversionKind::AppInstalls => "app_installs",
            ConversionKind::Transactions => "transactions",
            ConversionKind::Leads => "leads",
        }
    }
}

const fn r(lo: f64, hi: f64) -> BenchmarkRange {
    BenchmarkRange::new(lo, hi)
}

const fn cpc(meta: BenchmarkRange, google: BenchmarkRange) -> CpcRanges {
    CpcRanges { meta, google }
}

pub const INDUSTRIES: &[IndustryProfile] = &[
    IndustryProfile {
        key: "ecommerce_fashion",
        name: "E-commerce (Fashion)",
        objectives: &["Purchase Conversions", "Online Sales"],
        order_value: r(45.0, 120.0),
        ctr: r(1.2, 2.0),
        cvr: r(1.5, 3.5),
        cpc: cpc(r(0.50, 1.20), r(0.60, 1.50)),
        weekly_spend: SpendRange::new(5000, 15000),
        context_templates: &[
            "Selling women's clothing and accessories. Targeting ages {age_range}.",
            "Men's fashion brand. Focus on {season} collection.",
            "Fast fashion retailer targeting young adults {age_range}.",
        ],
    },
    IndustryProfile {
        key: "ecommerce_electronics",
        name: "E-commerce (Electronics)",
        objectives: &["Online Sales", "Purchase Conversions"],
        order_value: r(80.0, 400.0),
        ctr: r(1.8, 3.0),
        cvr: r(1.2, 2.5),
        cpc: cpc(r(0.35, 0.80), r(0.40, 0.90)),
        weekly_spend: SpendRange::new(8000, 20000),
        context_templates: &[
            "Selling smartphones, laptops, and accessories.",
            "Consumer electronics retailer. Competing with major brands.",
            "Tech gadgets and accessories store targeting tech enthusiasts.",
        ],
    },
    IndustryProfile {
        key: "ecommerce_home",
        name: "E-commerce (Home & Garden)",
        objectives: &["Purchase Conversions", "Online Sales"],
        order_value: r(60.0, 200.0),
        ctr: r(1.0, 1.8),
        cvr: r(1.5, 3.0),
        cpc: cpc(r(0.45, 1.00), r(0.50, 1.20)),
        weekly_spend: SpendRange::new(4000, 12000),
        context_templates: &[
            "Home decor and furniture. Targeting homeowners {age_range}.",
            "Garden supplies and outdoor furniture.",
            "Kitchen and home organization products.",
        ],
    },
    IndustryProfile {
        key: "b2b_saas",
        name: "B2B SaaS",
        objectives: &[
            "Lead Generation (Demo Requests)",
            "Lead Generation (Free Trial Signups)",
        ],
        order_value: BenchmarkRange::zero(),
        ctr: r(2.0, 4.0),
        cvr: r(2.0, 5.0),
        cpc: cpc(r(1.50, 4.00), r(3.00, 8.00)),
        weekly_spend: SpendRange::new(3000, 12000),
        context_templates: &[
            "Project management software. Competing with {competitors}.",
            "CRM platform targeting small businesses.",
            "HR software solution for mid-market companies.",
            "Marketing automation tool for agencies.",
        ],
    },
    IndustryProfile {
        key: "local_healthcare",
        name: "Local Service (Healthcare)",
        objectives: &["Lead Generation (Appointment Bookings)", "Lead Generation"],
        order_value: r(100.0, 300.0),
        ctr: r(1.4, 2.5),
        cvr: r(3.0, 6.0),
        cpc: cpc(r(0.60, 1.50), r(1.50, 4.00)),
        weekly_spend: SpendRange::new(1500, 5000),
        context_templates: &[
            "Dental clinic. Targeting {radius}-mile radius. Ages {age_range}.",
            "Medical spa offering cosmetic treatments.",
            "Physical therapy clinic targeting active adults.",
            "Optometry practice promoting eye exams and glasses.",
        ],
    },
    IndustryProfile {
        key: "local_home_services",
        name: "Local Service (Home Services)",
        objectives: &["Lead Generation", "Lead Generation (Quote Requests)"],
        order_value: r(150.0, 500.0),
        ctr: r(1.5, 3.0),
        cvr: r(3.0, 7.0),
        cpc: cpc(r(0.80, 2.00), r(2.00, 6.00)),
        weekly_spend: SpendRange::new(2000, 6000),
        context_templates: &[
            "HVAC services. Targeting homeowners within {radius} miles.",
            "Plumbing company serving local area.",
            "Roofing contractor targeting {radius}-mile radius.",
            "House cleaning service for busy professionals.",
        ],
    },
    IndustryProfile {
        key: "mobile_app_fitness",
        name: "Mobile App (Fitness)",
        objectives: &["App Installs", "App Installs + In-App Purchases"],
        order_value: r(10.0, 60.0),
        ctr: r(1.5, 2.5),
        // install rate from clicks runs far above web conversion rates
        cvr: r(12.0, 18.0),
        cpc: cpc(r(0.25, 0.60), r(0.40, 0.80)),
        weekly_spend: SpendRange::new(2000, 8000),
        context_templates: &[
            "Fitness app with subscription model. ${price}/month.",
            "Workout tracking app targeting health-conscious users {age_range}.",
            "Yoga and meditation app. Freemium model.",
        ],
    },
    IndustryProfile {
        key: "mobile_app_finance",
        name: "Mobile App (Finance)",
        objectives: &["App Installs", "App Installs + Account Signups"],
        order_value: BenchmarkRange::zero(),
        ctr: r(1.2, 2.0),
        cvr: r(8.0, 14.0),
        cpc: cpc(r(0.60, 1.50), r(0.80, 2.00)),
        weekly_spend: SpendRange::new(3000, 10000),
        context_templates: &[
            "Personal finance app. Free with premium features.",
            "Investment app targeting young professionals {age_range}.",
            "Budgeting app with subscription model.",
        ],
    },
    IndustryProfile {
        key: "education",
        name: "Education (Online Courses)",
        objectives: &["Lead Generation (Course Signups)", "Purchase Conversions"],
        order_value: r(50.0, 500.0),
        ctr: r(1.5, 2.5),
        cvr: r(2.0, 5.0),
        cpc: cpc(r(0.70, 1.80), r(1.00, 3.00)),
        weekly_spend: SpendRange::new(2000, 8000),
        context_templates: &[
            "Online course platform. Courses priced {price_range}.",
            "Professional certification programs.",
            "Language learning courses targeting adults.",
            "Coding bootcamp promoting career change programs.",
        ],
    },
    IndustryProfile {
        key: "food_restaurant",
        name: "Food & Restaurant",
        objectives: &[
            "Store Visits",
            "Online Orders",
            "Lead Generation (Reservations)",
        ],
        order_value: r(25.0, 60.0),
        ctr: r(1.8, 3.0),
        cvr: r(4.0, 8.0),
        cpc: cpc(r(0.30, 0.80), r(0.50, 1.20)),
        weekly_spend: SpendRange::new(1500, 6000),
        context_templates: &[
            "Restaurant chain with {num_locations} locations.",
            "Food delivery service targeting urban areas.",
            "Fast casual restaurant promoting new menu items.",
            "Fine dining restaurant targeting special occasions.",
        ],
    },
];
