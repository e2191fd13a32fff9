use anyhow::Result;
use crossterm::style::Stylize;

use super::util::{format_amount, parse_amount, truncate};
use crate::db::Database;
use crate::models::{Category, CategoryType, Transaction};
use crate::service;
use crate::suggest::Suggester;

const DEFAULT_LIST_LIMIT: u32 = 20;

pub(crate) fn as_cli(args: &[String], db: &mut Database, suggester: &Suggester) -> Result<()> {
    let rest = &args[2..];
    match args[1].as_str() {
        "suggest" => cli_suggest(rest, db, suggester),
        "add" | "a" => cli_add(rest, db, suggester),
        "list" | "ls" => cli_list(rest, db),
        "assign" => cli_assign(rest, db),
        "edit" => cli_edit(rest, db),
        "delete" => cli_delete(rest, db),
        "categories" => cli_categories(db),
        "add-category" => cli_add_category(rest, db),
        "rename-category" => cli_rename_category(rest, db),
        "edit-category" => cli_edit_category(rest, db),
        "delete-category" => cli_delete_category(rest, db),
        "reassign" => cli_reassign(rest, db),
        "patterns" => cli_patterns(db, suggester),
        "keywords" => cli_keywords(suggester),
        "autocat" => cli_autocat(db, suggester),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("smartbudget {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("SmartBudget — expense tracker that learns your categories");
    println!();
    println!("Usage: smartbudget [command]");
    println!();
    println!("Commands:");
    println!("  (none)                          Interactive entry with live suggestions");
    println!("  suggest <description>           Show suggested categories");
    println!("  add <amount> <description>      Add a transaction (top suggestion applied)");
    println!("    --category <name>             Category to file it under");
    println!("    --date <YYYY-MM-DD>           Transaction date (default: today)");
    println!("  list                            List recent transactions");
    println!("    --limit <N>                   How many (default: {DEFAULT_LIST_LIMIT})");
    println!("    --category <name>             Only this category");
    println!("  assign <txn-id> <category>      Recategorize a transaction");
    println!("  edit <txn-id>                   Change a transaction");
    println!("    --amount <A> --description <D> --date <YYYY-MM-DD>");
    println!("  delete <txn-id>                 Delete a transaction");
    println!("  categories                      List categories");
    println!("  add-category <name> <income|expense>");
    println!("    --icon <icon> --color <color> Optional display hints");
    println!("  rename-category <old> <new>     Rename a category");
    println!("  edit-category <name>            Change a category");
    println!("    --name <N> --icon <I> --color <C>");
    println!("  delete-category <name>          Delete a category");
    println!("    --reassign <name>             Move its transactions here first");
    println!("  reassign <from> <to|none>       Move all transactions between categories");
    println!("  patterns                        Show learned description patterns");
    println!("  keywords                        Show the keyword dictionary");
    println!("  autocat                         Categorize uncategorized transactions");
    println!("  --help, -h                      Show this help");
    println!("  --version, -V                   Show version");
}

// ── Argument helpers ──────────────────────────────────────────

/// Value following `flag`, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither one of `flags` nor a flag's value.
fn positional<'a>(args: &'a [String], flags: &[&str]) -> Result<Vec<&'a str>> {
    let mut words = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if flags.contains(&arg.as_str()) {
            if iter.next().is_none() {
                anyhow::bail!("Missing value for {arg}");
            }
        } else {
            words.push(arg.as_str());
        }
    }
    Ok(words)
}

fn require_category(db: &Database, name: &str) -> Result<Category> {
    db.find_category_by_name(name)?
        .ok_or_else(|| anyhow::anyhow!("Category '{name}' not found"))
}

fn category_id(category: &Category) -> Result<i64> {
    category
        .id
        .ok_or_else(|| anyhow::anyhow!("Category '{}' has no ID", category.name))
}

fn parse_id(s: &str) -> Result<i64> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Invalid transaction ID: {s}"))
}

// ── Transactions ──────────────────────────────────────────────

fn cli_suggest(args: &[String], db: &Database, suggester: &Suggester) -> Result<()> {
    let description = args.join(" ");
    if description.trim().is_empty() {
        anyhow::bail!("Usage: smartbudget suggest <description>");
    }

    let suggestions = service::suggest_detailed(db, suggester, &description)?;
    if suggestions.is_empty() {
        println!("No suggestions for \"{}\"", description.trim());
        return Ok(());
    }
    for (i, (category, source)) in suggestions.iter().enumerate() {
        println!(
            "  {}. {:<20} {}",
            i + 1,
            category.name,
            format!("({})", source.as_str()).dark_grey()
        );
    }
    Ok(())
}

fn cli_add(args: &[String], db: &Database, suggester: &Suggester) -> Result<()> {
    let words = positional(args, &["--category", "--date"])?;
    let (amount, description) = match words.split_first() {
        Some((amount, description)) if !description.is_empty() => (amount, description),
        _ => anyhow::bail!(
            "Usage: smartbudget add <amount> <description> [--category <name>] [--date YYYY-MM-DD]"
        ),
    };

    let amount = parse_amount(amount)?;
    let date = flag_value(args, "--date")
        .map(str::to_string)
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
    let mut txn = Transaction::new(date, description.join(" "), amount);

    if let Some(name) = flag_value(args, "--category") {
        let category = require_category(db, name)?;
        txn.category_id = Some(category_id(&category)?);
        let id = service::add_transaction(db, &txn)?;
        println!("Added #{id} {} → {}", format_amount(amount), category.name);
        return Ok(());
    }

    // Auto-applied suggestions are not user confirmations; skip learning.
    let top = service::suggest_categories(db, suggester, &txn.description)?
        .into_iter()
        .next();
    txn.category_id = top.as_ref().and_then(|c| c.id);
    let id = db.insert_transaction(&txn)?;
    match top {
        Some(category) => println!(
            "Added #{id} {} → {} {}",
            format_amount(amount),
            category.name,
            "(suggested)".dark_grey()
        ),
        None => println!("Added #{id} {} (uncategorized)", format_amount(amount)),
    }
    Ok(())
}

fn cli_list(args: &[String], db: &Database) -> Result<()> {
    let limit = match flag_value(args, "--limit") {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid --limit: {raw}"))?,
        None => DEFAULT_LIST_LIMIT,
    };
    let filter = match flag_value(args, "--category") {
        Some(name) => Some(category_id(&require_category(db, name)?)?),
        None => None,
    };

    let txns = db.get_transactions(Some(limit), filter)?;
    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }
    let categories = db.get_categories()?;

    println!(
        "{:<5} {:<10} {:<8} {:>12}  {:<16} Description",
        "ID", "Date", "Type", "Amount", "Category"
    );
    println!("{}", "─".repeat(90));
    for txn in &txns {
        let category = txn
            .category_id
            .and_then(|id| Category::find_by_id(&categories, id))
            .map(|c| c.name.as_str())
            .unwrap_or("—");
        let amount = format!("{:>12}", format_amount(txn.amount));
        let amount = if txn.is_income() {
            amount.green()
        } else {
            amount.red()
        };
        println!(
            "{:<5} {:<10} {:<8} {}  {:<16} {}",
            txn.id.unwrap_or(0),
            txn.date,
            txn.transaction_type().as_str(),
            amount,
            truncate(category, 16),
            truncate(&txn.description, 40),
        );
    }
    println!();
    println!(
        "Showing {} of {} transactions",
        txns.len(),
        db.get_transaction_count()?
    );
    Ok(())
}

fn cli_assign(args: &[String], db: &Database) -> Result<()> {
    let [id, name @ ..] = args else {
        anyhow::bail!("Usage: smartbudget assign <txn-id> <category>");
    };
    if name.is_empty() {
        anyhow::bail!("Usage: smartbudget assign <txn-id> <category>");
    }
    let category = require_category(db, &name.join(" "))?;
    let id = parse_id(id)?;
    service::assign_category(db, id, category_id(&category)?)?;
    println!("Transaction #{id} → {}", category.name);
    Ok(())
}

fn cli_edit(args: &[String], db: &Database) -> Result<()> {
    let words = positional(args, &["--amount", "--description", "--date"])?;
    let [id] = words.as_slice() else {
        anyhow::bail!(
            "Usage: smartbudget edit <txn-id> [--amount A] [--description D] [--date YYYY-MM-DD]"
        );
    };
    let id = parse_id(id)?;
    let mut txn = db
        .get_transaction_by_id(id)?
        .ok_or_else(|| anyhow::anyhow!("Transaction {id} not found"))?;

    let amount = flag_value(args, "--amount");
    let description = flag_value(args, "--description");
    let date = flag_value(args, "--date");
    if amount.is_none() && description.is_none() && date.is_none() {
        anyhow::bail!("Nothing to change: pass --amount, --description or --date");
    }
    if let Some(amount) = amount {
        txn.amount = parse_amount(amount)?;
    }
    if let Some(description) = description {
        txn.description = description.to_string();
    }
    if let Some(date) = date {
        txn.date = date.to_string();
    }

    db.update_transaction(&txn)?;
    println!(
        "Updated #{id} {} {} {}",
        txn.date,
        format_amount(txn.amount),
        txn.description.trim()
    );
    Ok(())
}

fn cli_delete(args: &[String], db: &Database) -> Result<()> {
    let [id] = args else {
        anyhow::bail!("Usage: smartbudget delete <txn-id>");
    };
    let id = parse_id(id)?;
    if db.get_transaction_by_id(id)?.is_none() {
        anyhow::bail!("Transaction {id} not found");
    }
    db.delete_transaction(id)?;
    println!("Deleted transaction #{id}");
    Ok(())
}

fn cli_autocat(db: &Database, suggester: &Suggester) -> Result<()> {
    let count = service::autocategorize(db, suggester)?;
    let remaining = db.get_uncategorized_transactions()?.len();
    println!("Auto-categorized {count} transactions ({remaining} still uncategorized)");
    Ok(())
}

// ── Categories ────────────────────────────────────────────────

fn cli_categories(db: &Database) -> Result<()> {
    let categories = db.get_categories()?;
    if categories.is_empty() {
        println!("No categories");
        return Ok(());
    }

    println!(
        "{:<4} {:<20} {:<8} {:<14} {:<8}",
        "ID", "Name", "Type", "Icon", "Color"
    );
    println!("{}", "─".repeat(60));
    for cat in &categories {
        let marker = if cat.is_default { "" } else { " (custom)" };
        println!(
            "{:<4} {:<20} {:<8} {:<14} {:<8}{marker}",
            cat.id.unwrap_or(0),
            cat.name,
            cat.category_type,
            cat.icon,
            cat.color,
        );
    }
    Ok(())
}

fn cli_add_category(args: &[String], db: &Database) -> Result<()> {
    let words = positional(args, &["--icon", "--color"])?;
    let usage = "Usage: smartbudget add-category <name> <income|expense> [--icon I] [--color C]";
    let Some((kind, name)) = words.split_last() else {
        anyhow::bail!(usage);
    };
    if name.is_empty() {
        anyhow::bail!(usage);
    }
    let category_type = CategoryType::parse(kind)
        .ok_or_else(|| anyhow::anyhow!("Category type must be income or expense, got '{kind}'"))?;

    let mut category = Category::new(name.join(" "), category_type);
    if let Some(icon) = flag_value(args, "--icon") {
        category.icon = icon.to_string();
    }
    if let Some(color) = flag_value(args, "--color") {
        category.color = color.to_string();
    }
    let id = db.insert_category(&category)?;
    println!("Created {category_type} category #{id} {}", category.name.trim());
    Ok(())
}

fn cli_rename_category(args: &[String], db: &Database) -> Result<()> {
    let [old, new] = args else {
        anyhow::bail!("Usage: smartbudget rename-category <old> <new>");
    };
    let category = require_category(db, old)?;
    db.rename_category(category_id(&category)?, new)?;
    println!("Renamed {} → {}", category.name, new.trim());
    Ok(())
}

fn cli_edit_category(args: &[String], db: &Database) -> Result<()> {
    let words = positional(args, &["--name", "--icon", "--color"])?;
    let [name] = words.as_slice() else {
        anyhow::bail!("Usage: smartbudget edit-category <name> [--name N] [--icon I] [--color C]");
    };
    let category = require_category(db, name)?;

    let new_name = flag_value(args, "--name");
    let icon = flag_value(args, "--icon");
    let color = flag_value(args, "--color");
    if new_name.is_none() && icon.is_none() && color.is_none() {
        anyhow::bail!("Nothing to change: pass --name, --icon or --color");
    }

    db.update_category(
        category_id(&category)?,
        new_name.unwrap_or(&category.name),
        icon.unwrap_or(&category.icon),
        color.unwrap_or(&category.color),
    )?;
    println!("Updated {}", new_name.map_or(category.name.as_str(), str::trim));
    Ok(())
}

fn cli_delete_category(args: &[String], db: &mut Database) -> Result<()> {
    let words = positional(args, &["--reassign"])?;
    let [name] = words.as_slice() else {
        anyhow::bail!("Usage: smartbudget delete-category <name> [--reassign <name>]");
    };
    let category = require_category(db, name)?;
    let target = match flag_value(args, "--reassign") {
        Some(target) => Some(require_category(db, target)?),
        None => None,
    };
    let target_id = target.as_ref().map(category_id).transpose()?;

    let moved = db.delete_category(category_id(&category)?, target_id)?;
    match target {
        Some(t) => println!(
            "Deleted {} ({moved} transactions moved to {})",
            category.name, t.name
        ),
        None => println!(
            "Deleted {} ({moved} transactions now uncategorized)",
            category.name
        ),
    }
    Ok(())
}

fn cli_reassign(args: &[String], db: &mut Database) -> Result<()> {
    let [from, to] = args else {
        anyhow::bail!("Usage: smartbudget reassign <from> <to|none>");
    };
    let source = require_category(db, from)?;
    let target = if to.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(require_category(db, to)?)
    };
    let target_id = target.as_ref().map(category_id).transpose()?;

    let moved = db.reassign_category(category_id(&source)?, target_id)?;
    let target_name = target.as_ref().map_or("uncategorized", |t| t.name.as_str());
    println!("Moved {moved} transactions from {} to {target_name}", source.name);
    Ok(())
}

// ── Learning ──────────────────────────────────────────────────

fn cli_patterns(db: &Database, suggester: &Suggester) -> Result<()> {
    let mut patterns = db.get_patterns()?;
    if patterns.is_empty() {
        println!("No learned patterns yet");
        return Ok(());
    }
    patterns.sort_by(|a, b| b.count.cmp(&a.count));
    let categories = db.get_categories()?;
    let min_count = suggester.config().min_count;

    println!(
        "{:<32} {:<20} {:>5}  Last used",
        "Description", "Category", "Count"
    );
    println!("{}", "─".repeat(80));
    for pattern in &patterns {
        let category = Category::find_by_id(&categories, pattern.category_id)
            .map(|c| c.name.as_str())
            .unwrap_or("?");
        let count = format!("{:>5}", pattern.count);
        let count = if pattern.count >= min_count {
            count.bold()
        } else {
            count.dark_grey()
        };
        println!(
            "{:<32} {:<20} {}  {}",
            truncate(&pattern.description, 32),
            truncate(category, 20),
            count,
            pattern.last_used.get(..10).unwrap_or(pattern.last_used.as_str()),
        );
    }
    println!();
    println!("Patterns are trusted after {min_count} assignments");
    Ok(())
}

fn cli_keywords(suggester: &Suggester) -> Result<()> {
    for entry in suggester.dictionary().entries() {
        println!("{} {}", entry.name.as_str().bold(), format!("[{}]", entry.slug).dark_grey());
        println!("    {}", entry.keywords.join(", "));
    }
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
