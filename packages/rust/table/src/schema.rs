//! The fixed Outlook 2003 CSV column schema.

use std::str::FromStr;

use vcf2csv_shared::Vcf2CsvError;

/// Number of columns in the Outlook CSV header.
pub const COLUMN_COUNT: usize = 56;

macro_rules! columns {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// One column of the Outlook CSV import format, declared in header order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Column {
            $($variant),+
        }

        impl Column {
            /// Every column, in header order.
            pub const ALL: [Column; COLUMN_COUNT] = [$(Column::$variant),+];

            /// Header text of this column.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Column::$variant => $name),+
                }
            }
        }
    };
}

columns! {
    Title => "Title",
    FirstName => "First Name",
    MiddleName => "Middle Name",
    LastName => "Last Name",
    Suffix => "Suffix",
    GivenNameYomi => "Given Name Yomi",
    FamilyNameYomi => "Family Name Yomi",
    HomeStreet => "Home Street",
    HomeCity => "Home City",
    HomeState => "Home State",
    HomePostalCode => "Home Postal Code",
    HomeCountry => "Home Country",
    Company => "Company",
    Department => "Department",
    JobTitle => "Job Title",
    OfficeLocation => "Office Location",
    BusinessStreet => "Business Street",
    BusinessCity => "Business City",
    BusinessState => "Business State",
    BusinessPostalCode => "Business Postal Code",
    BusinessCountry => "Business Country",
    OtherStreet => "Other Street",
    OtherCity => "Other City",
    OtherState => "Other State",
    OtherPostalCode => "Other Postal Code",
    OtherCountry => "Other Country",
    AssistantPhone => "Assistant's Phone",
    BusinessFax => "Business Fax",
    BusinessPhone => "Business Phone",
    BusinessPhone2 => "Business Phone 2",
    Callback => "Callback",
    CarPhone => "Car Phone",
    CompanyMainPhone => "Company Main Phone",
    HomeFax => "Home Fax",
    HomePhone => "Home Phone",
    HomePhone2 => "Home Phone 2",
    Isdn => "ISDN",
    MobilePhone => "Mobile Phone",
    OtherFax => "Other Fax",
    OtherPhone => "Other Phone",
    Pager => "Pager",
    PrimaryPhone => "Primary Phone",
    RadioPhone => "Radio Phone",
    TtyTddPhone => "TTY/TDD Phone",
    Telex => "Telex",
    Anniversary => "Anniversary",
    Birthday => "Birthday",
    EmailAddress => "E-mail Address",
    EmailType => "E-mail Type",
    Email2Address => "E-mail 2 Address",
    Email2Type => "E-mail 2 Type",
    Email3Address => "E-mail 3 Address",
    Email3Type => "E-mail 3 Type",
    Notes => "Notes",
    Spouse => "Spouse",
    WebPage => "Web Page",
}

/// Phone columns in the order numbers are assigned to them.
pub const PHONE_COLUMNS: [Column; 12] = [
    Column::MobilePhone,
    Column::PrimaryPhone,
    Column::OtherPhone,
    Column::HomePhone,
    Column::HomePhone2,
    Column::BusinessPhone,
    Column::BusinessPhone2,
    Column::RadioPhone,
    Column::TtyTddPhone,
    Column::CarPhone,
    Column::CompanyMainPhone,
    Column::AssistantPhone,
];

impl Column {
    /// Position of this column in the header.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Header names in order.
    pub fn header() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(Column::name)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = Vcf2CsvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| Vcf2CsvError::UnknownColumn { name: s.to_string() })
    }
}
