//! # Company Commands
//!
//! The buying company printed on purchase orders. When several are stored,
//! orders use the one with the lowest id (`company default`).

use clap::{Args, Subcommand};

use compras_core::cnpj::format_cnpj;
use compras_core::validation::validate_company;
use compras_core::{Company, CoreError};

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Subcommand)]
pub enum CompanyCommand {
    /// Register a company
    Add {
        name: String,
        cnpj: String,
        /// Person placing the orders
        buyer: String,
    },

    /// List companies, newest first
    List,

    Show { id: i64 },

    /// Change name, CNPJ or buyer
    Update(UpdateCompanyArgs),

    Delete { id: i64 },

    /// Show the company used on purchase orders
    Default,
}

#[derive(Debug, Default, Args)]
pub struct UpdateCompanyArgs {
    pub id: i64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub cnpj: Option<String>,

    #[arg(long)]
    pub buyer: Option<String>,
}

pub async fn run(state: &AppState, command: CompanyCommand) -> AppResult<()> {
    match command {
        CompanyCommand::Add { name, cnpj, buyer } => {
            let id = add(state, Company::new(name, cnpj, buyer)).await?;
            println!("Company {} added", id);
        }
        CompanyCommand::List => {
            let companies = state.db().companies().get_all().await?;
            if companies.is_empty() {
                println!("No companies");
            }
            for company in &companies {
                println!("{}", line(company));
            }
        }
        CompanyCommand::Show { id } => println!("{}", line(&show(state, id).await?)),
        CompanyCommand::Update(args) => {
            let company = update(state, args).await?;
            println!("Updated: {}", line(&company));
        }
        CompanyCommand::Delete { id } => {
            state.db().companies().delete(id).await?;
            println!("Company {} deleted", id);
        }
        CompanyCommand::Default => {
            let company = default_company(state).await?;
            println!("{}", line(&company));
        }
    }

    Ok(())
}

/// Validates and stores a company with its CNPJ formatted.
pub async fn add(state: &AppState, company: Company) -> AppResult<i64> {
    let company = normalized(company)?;
    Ok(state.db().companies().create(&company).await?)
}

pub async fn show(state: &AppState, id: i64) -> AppResult<Company> {
    state
        .db()
        .companies()
        .get_by_id(id)
        .await?
        .ok_or_else(|| CoreError::CompanyNotFound(id).into())
}

pub async fn update(state: &AppState, args: UpdateCompanyArgs) -> AppResult<Company> {
    let mut company = show(state, args.id).await?;

    if let Some(name) = args.name {
        company.name = name;
    }
    if let Some(cnpj) = args.cnpj {
        company.cnpj = cnpj;
    }
    if let Some(buyer) = args.buyer {
        company.buyer_name = buyer;
    }

    let company = normalized(company)?;
    state.db().companies().update(&company).await?;
    Ok(company)
}

/// The company printed on purchase orders.
pub async fn default_company(state: &AppState) -> AppResult<Company> {
    state
        .db()
        .companies()
        .get_default()
        .await?
        .ok_or_else(|| CoreError::NoDefaultCompany.into())
}

fn normalized(mut company: Company) -> AppResult<Company> {
    company.name = company.name.trim().to_string();
    company.buyer_name = company.buyer_name.trim().to_string();
    CoreError::check(validate_company(&company))?;

    company.cnpj = format_cnpj(&company.cnpj);
    Ok(company)
}

fn line(company: &Company) -> String {
    format!(
        "#{:<4} {:<40} CNPJ {:<18} buyer: {}",
        company.id.unwrap_or_default(),
        company.name,
        company.cnpj,
        company.buyer_name
    )
}
