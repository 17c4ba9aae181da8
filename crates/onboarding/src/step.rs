/// The six wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WizardStep {
    Identity = 1,
    Profile = 2,
    Compliance = 3,
    Address = 4,
    Activation = 5,
    Summary = 6,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::Identity,
        WizardStep::Profile,
        WizardStep::Compliance,
        WizardStep::Address,
        WizardStep::Activation,
        WizardStep::Summary,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Identity => "Identity",
            WizardStep::Profile => "Profile",
            WizardStep::Compliance => "Compliance",
            WizardStep::Address => "Address",
            WizardStep::Activation => "Activation",
            WizardStep::Summary => "Summary",
        }
    }
}

impl core::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}
