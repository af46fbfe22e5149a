// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::ids::CompanyNumber;
use crate::model::{CompanyType, CountryType, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    CompanyNumber,
    Abbreviated,
    CompanyName,
    Representative,
    ResponsibleFor,
    BusinessType,
    Items,
    PostalCode,
    PrimaryAddress,
    DetailedAddress,
    PhoneNumber,
    FaxNumber,
    HomepageUrl,
    ContractPeriod1,
    ContractPeriod2,
    RegistrationInformation,
    RegistrationDateTime,
    ChangeInformation,
    ChangeDateTime,
    Offices,
    BankingInformation,
    AccountNumber,
}

impl FormField {
    pub const ALL: [Self; 22] = [
        Self::CompanyNumber,
        Self::Abbreviated,
        Self::CompanyName,
        Self::Representative,
        Self::ResponsibleFor,
        Self::BusinessType,
        Self::Items,
        Self::PostalCode,
        Self::PrimaryAddress,
        Self::DetailedAddress,
        Self::PhoneNumber,
        Self::FaxNumber,
        Self::HomepageUrl,
        Self::ContractPeriod1,
        Self::ContractPeriod2,
        Self::RegistrationInformation,
        Self::RegistrationDateTime,
        Self::ChangeInformation,
        Self::ChangeDateTime,
        Self::Offices,
        Self::BankingInformation,
        Self::AccountNumber,
    ];

    /// Field name on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CompanyNumber => "companyNumber",
            Self::Abbreviated => "abbreviated",
            Self::CompanyName => "companyName",
            Self::Representative => "representative",
            Self::ResponsibleFor => "responsiblefor",
            Self::BusinessType => "businessType",
            Self::Items => "items",
            Self::PostalCode => "postalCode",
            Self::PrimaryAddress => "primaryAddress",
            Self::DetailedAddress => "detailedAddress",
            Self::PhoneNumber => "phoneNumber",
            Self::FaxNumber => "faxNumber",
            Self::HomepageUrl => "homepageurl",
            Self::ContractPeriod1 => "contractPeriod1",
            Self::ContractPeriod2 => "contractPeriod2",
            Self::RegistrationInformation => "registrationInformation",
            Self::RegistrationDateTime => "registrationDateTime",
            Self::ChangeInformation => "changeInformation",
            Self::ChangeDateTime => "changeDateTime",
            Self::Offices => "offices",
            Self::BankingInformation => "bankingInformation",
            Self::AccountNumber => "accountNumber",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(value))
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CompanyNumber => "business number",
            Self::Abbreviated => "short name",
            Self::CompanyName => "company name",
            Self::Representative => "representative",
            Self::ResponsibleFor => "contact person",
            Self::BusinessType => "business type",
            Self::Items => "items",
            Self::PostalCode => "postal code",
            Self::PrimaryAddress => "address",
            Self::DetailedAddress => "address detail",
            Self::PhoneNumber => "phone",
            Self::FaxNumber => "fax",
            Self::HomepageUrl => "homepage",
            Self::ContractPeriod1 => "contract start",
            Self::ContractPeriod2 => "contract end",
            Self::RegistrationInformation => "registered by",
            Self::RegistrationDateTime => "registered at",
            Self::ChangeInformation => "changed by",
            Self::ChangeDateTime => "changed at",
            Self::Offices => "office",
            Self::BankingInformation => "bank",
            Self::AccountNumber => "account number",
        }
    }
}

/// The single record being edited. Owns its strings; never aliases a list
/// entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormDraft {
    pub company_number: String,
    pub abbreviated: String,
    pub company_name: String,
    pub representative: String,
    pub responsible_for: String,
    pub business_type: String,
    pub items: String,
    pub postal_code: String,
    pub primary_address: String,
    pub detailed_address: String,
    pub phone_number: String,
    pub fax_number: String,
    pub homepage_url: String,
    pub company_type: CompanyType,
    pub country_type: CountryType,
    pub contract_period1: String,
    pub contract_period2: String,
    pub registration_information: String,
    pub registration_date_time: String,
    pub change_information: String,
    pub change_date_time: String,
    pub offices: String,
    pub banking_information: String,
    pub account_number: String,
}

impl FormDraft {
    pub fn select(record: &Record) -> Self {
        fn text(value: &Option<String>) -> String {
            value.clone().unwrap_or_default()
        }

        Self {
            company_number: record.company_number.clone(),
            abbreviated: text(&record.abbreviated),
            company_name: text(&record.company_name),
            representative: text(&record.representative),
            responsible_for: text(&record.responsible_for),
            business_type: text(&record.business_type),
            items: text(&record.items),
            postal_code: text(&record.postal_code),
            primary_address: text(&record.primary_address),
            detailed_address: text(&record.detailed_address),
            phone_number: text(&record.phone_number),
            fax_number: text(&record.fax_number),
            homepage_url: text(&record.homepage_url),
            company_type: record
                .company_type
                .as_deref()
                .and_then(CompanyType::parse)
                .unwrap_or_default(),
            country_type: record
                .country_type
                .as_deref()
                .and_then(CountryType::parse)
                .unwrap_or_default(),
            contract_period1: text(&record.contract_period1),
            contract_period2: text(&record.contract_period2),
            registration_information: text(&record.registration_information),
            registration_date_time: text(&record.registration_date_time),
            change_information: text(&record.change_information),
            change_date_time: text(&record.change_date_time),
            offices: text(&record.offices),
            banking_information: text(&record.banking_information),
            account_number: text(&record.account_number),
        }
    }

    pub fn reset() -> Self {
        Self::default()
    }

    /// Payload for create/update. Empty strings are sent as-is; the key is
    /// trimmed to match `CompanyNumber`.
    pub fn to_record(&self) -> Record {
        Record {
            company_number: self.company_number.trim().to_owned(),
            abbreviated: Some(self.abbreviated.clone()),
            company_name: Some(self.company_name.clone()),
            representative: Some(self.representative.clone()),
            responsible_for: Some(self.responsible_for.clone()),
            business_type: Some(self.business_type.clone()),
            items: Some(self.items.clone()),
            postal_code: Some(self.postal_code.clone()),
            primary_address: Some(self.primary_address.clone()),
            detailed_address: Some(self.detailed_address.clone()),
            phone_number: Some(self.phone_number.clone()),
            fax_number: Some(self.fax_number.clone()),
            homepage_url: Some(self.homepage_url.clone()),
            company_type: Some(self.company_type.as_str().to_owned()),
            country_type: Some(self.country_type.as_str().to_owned()),
            contract_period1: Some(self.contract_period1.clone()),
            contract_period2: Some(self.contract_period2.clone()),
            registration_information: Some(self.registration_information.clone()),
            registration_date_time: Some(self.registration_date_time.clone()),
            change_information: Some(self.change_information.clone()),
            change_date_time: Some(self.change_date_time.clone()),
            offices: Some(self.offices.clone()),
            banking_information: Some(self.banking_information.clone()),
            account_number: Some(self.account_number.clone()),
        }
    }

    pub fn key(&self) -> Option<CompanyNumber> {
        CompanyNumber::parse(&self.company_number)
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::CompanyNumber => &self.company_number,
            FormField::Abbreviated => &self.abbreviated,
            FormField::CompanyName => &self.company_name,
            FormField::Representative => &self.representative,
            FormField::ResponsibleFor => &self.responsible_for,
            FormField::BusinessType => &self.business_type,
            FormField::Items => &self.items,
            FormField::PostalCode => &self.postal_code,
            FormField::PrimaryAddress => &self.primary_address,
            FormField::DetailedAddress => &self.detailed_address,
            FormField::PhoneNumber => &self.phone_number,
            FormField::FaxNumber => &self.fax_number,
            FormField::HomepageUrl => &self.homepage_url,
            FormField::ContractPeriod1 => &self.contract_period1,
            FormField::ContractPeriod2 => &self.contract_period2,
            FormField::RegistrationInformation => &self.registration_information,
            FormField::RegistrationDateTime => &self.registration_date_time,
            FormField::ChangeInformation => &self.change_information,
            FormField::ChangeDateTime => &self.change_date_time,
            FormField::Offices => &self.offices,
            FormField::BankingInformation => &self.banking_information,
            FormField::AccountNumber => &self.account_number,
        }
    }

    pub fn set(&mut self, field: FormField, value: &str) {
        let slot = match field {
            FormField::CompanyNumber => &mut self.company_number,
            FormField::Abbreviated => &mut self.abbreviated,
            FormField::CompanyName => &mut self.company_name,
            FormField::Representative => &mut self.representative,
            FormField::ResponsibleFor => &mut self.responsible_for,
            FormField::BusinessType => &mut self.business_type,
            FormField::Items => &mut self.items,
            FormField::PostalCode => &mut self.postal_code,
            FormField::PrimaryAddress => &mut self.primary_address,
            FormField::DetailedAddress => &mut self.detailed_address,
            FormField::PhoneNumber => &mut self.phone_number,
            FormField::FaxNumber => &mut self.fax_number,
            FormField::HomepageUrl => &mut self.homepage_url,
            FormField::ContractPeriod1 => &mut self.contract_period1,
            FormField::ContractPeriod2 => &mut self.contract_period2,
            FormField::RegistrationInformation => &mut self.registration_information,
            FormField::RegistrationDateTime => &mut self.registration_date_time,
            FormField::ChangeInformation => &mut self.change_information,
            FormField::ChangeDateTime => &mut self.change_date_time,
            FormField::Offices => &mut self.offices,
            FormField::BankingInformation => &mut self.banking_information,
            FormField::AccountNumber => &mut self.account_number,
        };
        value.clone_into(slot);
    }

    pub fn validate(&self) -> Result<()> {
        if self.company_number.trim().is_empty() {
            bail!("business number is required -- enter a business number and retry");
        }
        Ok(())
    }
}
