//! CLI Module
//!
//! Command-line surface: one subcommand per Xero operation plus cache
//! administration and serve mode. Results are printed as pretty JSON so a
//! calling agent can consume stdout directly.

use std::time::Duration;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;

use crate::cache::Cache;
use crate::config::Config;
use crate::error::XeroError;
use crate::models::{
    Contact, ContactsResponse, Invoice, InvoicesResponse, Payment, PaymentsResponse, Quote,
    QuotesResponse, ReportKind, StatsResponse,
};
use crate::service::{
    ListContactsParams, ListInvoicesParams, ListParams, ReportParams, XeroService,
};
use crate::xero::XeroClient;

// == Command Definition ==
/// Builds the full command tree.
pub fn build_command() -> Command {
    Command::new("xero-cli")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Xero accounting API client with read-through caching")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("no-cache")
                .long("no-cache")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Bypass the cache for this invocation"),
        )
        .subcommand(
            list_command("list-contacts", "List contacts").arg(
                Arg::new("search")
                    .long("search")
                    .value_name("TERM")
                    .help("Free-text search across name and email"),
            ),
        )
        .subcommand(
            Command::new("get-contact")
                .about("Fetch a single contact")
                .arg(id_arg("contact_id", "CONTACT_ID")),
        )
        .subcommand(
            Command::new("create-contact")
                .about("Create a contact")
                .arg(
                    Arg::new("name")
                        .long("name")
                        .value_name("NAME")
                        .required(true)
                        .help("Contact name"),
                )
                .arg(Arg::new("first-name").long("first-name").value_name("FIRST"))
                .arg(Arg::new("last-name").long("last-name").value_name("LAST"))
                .arg(Arg::new("email").long("email").value_name("EMAIL")),
        )
        .subcommand(
            Command::new("update-contact")
                .about("Update an existing contact")
                .arg(id_arg("contact_id", "CONTACT_ID"))
                .arg(Arg::new("name").long("name").value_name("NAME"))
                .arg(Arg::new("first-name").long("first-name").value_name("FIRST"))
                .arg(Arg::new("last-name").long("last-name").value_name("LAST"))
                .arg(Arg::new("email").long("email").value_name("EMAIL")),
        )
        .subcommand(
            list_command("list-invoices", "List invoices").arg(
                Arg::new("statuses")
                    .long("statuses")
                    .value_name("STATUSES")
                    .help("Comma-separated status filter, e.g. DRAFT,AUTHORISED"),
            ),
        )
        .subcommand(
            Command::new("get-invoice")
                .about("Fetch a single invoice")
                .arg(id_arg("invoice_id", "INVOICE_ID")),
        )
        .subcommand(
            Command::new("create-invoice")
                .about("Create an invoice from a JSON payload")
                .arg(json_arg("Invoice JSON, e.g. '{\"Type\":\"ACCREC\",...}'")),
        )
        .subcommand(
            Command::new("update-invoice")
                .about("Update an invoice from a JSON payload")
                .arg(id_arg("invoice_id", "INVOICE_ID"))
                .arg(json_arg("Invoice JSON with the fields to change")),
        )
        .subcommand(list_command("list-payments", "List payments"))
        .subcommand(
            Command::new("create-payment")
                .about("Apply a payment from a JSON payload")
                .arg(json_arg("Payment JSON with Invoice, Account, Date, Amount")),
        )
        .subcommand(list_command("list-quotes", "List quotes"))
        .subcommand(
            Command::new("create-quote")
                .about("Create a quote from a JSON payload")
                .arg(json_arg("Quote JSON")),
        )
        .subcommand(
            Command::new("report")
                .about("Fetch a report (balance-sheet, profit-and-loss, trial-balance)")
                .arg(id_arg("report", "REPORT"))
                .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD"))
                .arg(Arg::new("from").long("from").value_name("YYYY-MM-DD"))
                .arg(Arg::new("to").long("to").value_name("YYYY-MM-DD"))
                .arg(
                    Arg::new("periods")
                        .long("periods")
                        .value_name("N")
                        .value_parser(value_parser!(u32)),
                )
                .arg(Arg::new("timeframe").long("timeframe").value_name("TIMEFRAME")),
        )
        .subcommand(Command::new("cache-stats").about("Show cache statistics"))
        .subcommand(Command::new("cache-clear").about("Clear all cached data"))
        .subcommand(
            Command::new("cache-invalidate")
                .about("Invalidate a specific cache key")
                .arg(id_arg("key", "KEY")),
        )
        .subcommand(Command::new("serve").about("Run the HTTP service wrapper"))
}

fn list_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(
            Arg::new("where")
                .long("where")
                .value_name("FILTER")
                .help("Xero where clause, e.g. 'Status==\"AUTHORISED\"'"),
        )
        .arg(Arg::new("order").long("order").value_name("FIELD"))
        .arg(
            Arg::new("page")
                .long("page")
                .value_name("N")
                .value_parser(value_parser!(u32)),
        )
}

fn id_arg(name: &'static str, value_name: &'static str) -> Arg {
    Arg::new(name).value_name(value_name).required(true)
}

fn json_arg(help: &'static str) -> Arg {
    Arg::new("json")
        .long("json")
        .value_name("JSON")
        .required(true)
        .help(help)
}

// == Execution ==
/// Runs the matched subcommand (everything except `serve`, which owns the
/// process and is driven from `main`).
pub async fn execute(config: &Config, matches: &ArgMatches) -> anyhow::Result<()> {
    let no_cache = matches.get_flag("no-cache");

    let (name, sub) = matches
        .subcommand()
        .expect("subcommand is required by clap");

    // Cache administration works without credentials
    match name {
        "cache-stats" => {
            let cache = build_cache(config);
            return print_json(&StatsResponse::from(cache.stats().await));
        }
        "cache-clear" => {
            let cache = build_cache(config);
            let removed = cache.clear().await;
            return print_json(&serde_json::json!({ "removed": removed }));
        }
        "cache-invalidate" => {
            let cache = build_cache(config);
            let key = required(sub, "key");
            let removed = cache.invalidate(&key).await;
            return print_json(&serde_json::json!({ "key": key, "removed": removed }));
        }
        _ => {}
    }

    let service = build_service(config)?;

    match name {
        "list-contacts" => {
            let params = ListContactsParams {
                where_filter: optional(sub, "where"),
                order: optional(sub, "order"),
                page: sub.get_one::<u32>("page").copied(),
                search_term: optional(sub, "search"),
            };
            let contacts = service.list_contacts(&params, no_cache).await?;
            print_json(&ContactsResponse { contacts })
        }
        "get-contact" => {
            let contact = service
                .get_contact(&required(sub, "contact_id"), no_cache)
                .await?;
            print_json(&contact)
        }
        "create-contact" => {
            let contact = contact_from_args(sub);
            let created = service.create_contact(contact).await?;
            print_json(&created)
        }
        "update-contact" => {
            let contact = contact_from_args(sub);
            let updated = service
                .update_contact(&required(sub, "contact_id"), contact)
                .await?;
            print_json(&updated)
        }
        "list-invoices" => {
            let params = ListInvoicesParams {
                where_filter: optional(sub, "where"),
                order: optional(sub, "order"),
                page: sub.get_one::<u32>("page").copied(),
                statuses: optional(sub, "statuses"),
            };
            let invoices = service.list_invoices(&params, no_cache).await?;
            print_json(&InvoicesResponse { invoices })
        }
        "get-invoice" => {
            let invoice = service
                .get_invoice(&required(sub, "invoice_id"), no_cache)
                .await?;
            print_json(&invoice)
        }
        "create-invoice" => {
            let invoice: Invoice = parse_json_arg(sub)?;
            let created = service.create_invoice(invoice).await?;
            print_json(&created)
        }
        "update-invoice" => {
            let invoice: Invoice = parse_json_arg(sub)?;
            let updated = service
                .update_invoice(&required(sub, "invoice_id"), invoice)
                .await?;
            print_json(&updated)
        }
        "list-payments" => {
            let params = list_params(sub);
            let payments = service.list_payments(&params, no_cache).await?;
            print_json(&PaymentsResponse { payments })
        }
        "create-payment" => {
            let payment: Payment = parse_json_arg(sub)?;
            let created = service.create_payment(payment).await?;
            print_json(&created)
        }
        "list-quotes" => {
            let params = list_params(sub);
            let quotes = service.list_quotes(&params, no_cache).await?;
            print_json(&QuotesResponse { quotes })
        }
        "create-quote" => {
            let quote: Quote = parse_json_arg(sub)?;
            let created = service.create_quote(quote).await?;
            print_json(&created)
        }
        "report" => {
            let kind: ReportKind = required(sub, "report").parse()?;
            let params = ReportParams {
                date: optional(sub, "date"),
                from_date: optional(sub, "from"),
                to_date: optional(sub, "to"),
                periods: sub.get_one::<u32>("periods").copied(),
                timeframe: optional(sub, "timeframe"),
            };
            let report = service.get_report(kind, &params, no_cache).await?;
            print_json(&report)
        }
        other => anyhow::bail!("unhandled subcommand '{}'", other),
    }
}

// == Argument Helpers ==
fn build_cache(config: &Config) -> Cache {
    Cache::new("xero", Duration::from_secs(config.default_cache_ttl))
}

fn build_service(config: &Config) -> anyhow::Result<XeroService> {
    let client = XeroClient::from_config(config)?;
    Ok(XeroService::new(client, build_cache(config)))
}

fn required(matches: &ArgMatches, name: &str) -> String {
    matches
        .get_one::<String>(name)
        .cloned()
        .expect("argument is required by clap")
}

fn optional(matches: &ArgMatches, name: &str) -> Option<String> {
    matches.get_one::<String>(name).cloned()
}

fn list_params(matches: &ArgMatches) -> ListParams {
    ListParams {
        where_filter: optional(matches, "where"),
        order: optional(matches, "order"),
        page: matches.get_one::<u32>("page").copied(),
    }
}

fn contact_from_args(matches: &ArgMatches) -> Contact {
    Contact {
        name: optional(matches, "name"),
        first_name: optional(matches, "first-name"),
        last_name: optional(matches, "last-name"),
        email_address: optional(matches, "email"),
        ..Contact::default()
    }
}

fn parse_json_arg<T: serde::de::DeserializeOwned>(matches: &ArgMatches) -> anyhow::Result<T> {
    let raw = required(matches, "json");
    serde_json::from_str(&raw)
        .map_err(|e| XeroError::InvalidArgument(format!("malformed JSON payload: {}", e)).into())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_tree_is_consistent() {
        build_command().debug_assert();
    }

    #[test]
    fn test_list_contacts_args() {
        let matches = build_command()
            .try_get_matches_from([
                "xero-cli",
                "list-contacts",
                "--where",
                "Name==\"A\"",
                "--page",
                "2",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "list-contacts");
        assert_eq!(sub.get_one::<String>("where").unwrap(), "Name==\"A\"");
        assert_eq!(sub.get_one::<u32>("page"), Some(&2));
    }

    #[test]
    fn test_no_cache_is_global() {
        let matches = build_command()
            .try_get_matches_from(["xero-cli", "list-invoices", "--no-cache"])
            .unwrap();
        assert!(matches.get_flag("no-cache"));
    }

    #[test]
    fn test_create_contact_requires_name() {
        let result = build_command().try_get_matches_from(["xero-cli", "create-contact"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_report_positional() {
        let matches = build_command()
            .try_get_matches_from(["xero-cli", "report", "balance-sheet", "--date", "2026-06-30"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<String>("report").unwrap(), "balance-sheet");
    }

    #[test]
    fn test_contact_from_args_sparse() {
        let matches = build_command()
            .try_get_matches_from(["xero-cli", "create-contact", "--name", "New Co"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let contact = contact_from_args(sub);
        assert_eq!(contact.name.as_deref(), Some("New Co"));
        assert!(contact.email_address.is_none());
    }
}
