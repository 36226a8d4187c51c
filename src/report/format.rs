//! Formatted terminal output.
//!
//! We keep formatting code in one place so the query/option logic stays free
//! of presentation concerns.

use crate::domain::{Contact, Funding, PageInfo, Paginated, Partner, Partnership, ValueLabel};
use crate::options::CheckboxItem;
use crate::query::SearchParams;

const DASH: &str = "-";

/// Partner search results followed by the page line.
pub fn format_partners(page: &Paginated<Partner>, info: &PageInfo) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<40} {:<22} {:<20} {:<4} {:<14}\n",
        "Partner", "Type", "City", "Ctry", "Erasmus code"
    ));
    for p in &page.results {
        out.push_str(&format!(
            "{:<40} {:<22} {:<20} {:<4} {:<14}\n",
            truncate(&p.name, 40),
            truncate(or_dash(p.partner_type.as_deref()), 22),
            truncate(or_dash(p.city.as_deref()), 20),
            or_dash(p.country.as_deref()),
            or_dash(p.erasmus_code.as_deref()),
        ));
    }
    if page.results.is_empty() {
        out.push_str("(no partners)\n");
    }
    out.push_str(&format_page_info(info));
    out
}

/// Partnership search results with their derived mobility type.
pub fn format_partnerships(page: &Paginated<Partnership>, info: &PageInfo) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<30} {:<30} {:<26} {:<38}\n",
        "UCL entity", "Partner", "Education field", "Mobility"
    ));
    for p in &page.results {
        out.push_str(&format!(
            "{:<30} {:<30} {:<26} {:<38}\n",
            truncate(or_dash(p.ucl_university.as_deref()), 30),
            truncate(&p.partner.name, 30),
            truncate(or_dash(p.education_field.as_deref()), 26),
            or_dash(Some(p.mobility_type().as_str())),
        ));
    }
    if page.results.is_empty() {
        out.push_str("(no partnerships)\n");
    }
    out.push_str(&format_page_info(info));
    out
}

/// Detail block for a single partner.
pub fn format_partner_detail(partner: &Partner) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", partner.name));
    out.push_str(&format!("- uuid        : {}\n", or_dash(Some(partner.uuid.as_str()))));
    out.push_str(&format!("- type        : {}\n", or_dash(partner.partner_type.as_deref())));
    out.push_str(&format!("- erasmus code: {}\n", or_dash(partner.erasmus_code.as_deref())));
    out.push_str(&format!(
        "- location    : {}, {}\n",
        or_dash(partner.city.as_deref()),
        or_dash(partner.country.as_deref())
    ));
    out.push_str(&format!("- website     : {}\n", or_dash(partner.website.as_deref())));
    out
}

/// Detail block for a single partnership: outgoing, incoming and staff
/// mobility sections.
pub fn format_partnership_detail(p: &Partnership) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} / {}\n",
        or_dash(p.ucl_university.as_deref()),
        or_dash(Some(p.partner.name.as_str()))
    ));
    out.push_str(&format!("- education field: {}\n", or_dash(p.education_field.as_deref())));
    out.push_str(&format!("- laboratory     : {}\n", or_dash(p.ucl_university_labo.as_deref())));
    out.push_str(&format!("- supervisor     : {}\n", or_dash(p.supervisor.as_deref())));
    out.push_str(&format!("- mobility       : {}\n", or_dash(Some(p.mobility_type().as_str()))));
    let status = match p.status {
        Some(s) if s.valid => "valid",
        Some(s) if s.last_valid => "previously valid",
        Some(_) => "not valid",
        None => DASH,
    };
    out.push_str(&format!("- status         : {status}\n"));

    out.push_str("Outgoing\n");
    out.push_str(&format!("- education level : {}\n", or_dash(p.out_education_level.as_deref())));
    out.push_str(&format!("- entity          : {}\n", or_dash(p.out_entity.as_deref())));
    out.push_str(&format!("- university offer: {}\n", or_dash(p.out_university_offer.as_deref())));
    out.push_str(&format!("- portal          : {}\n", or_dash(p.out_portal.as_deref())));
    out.push_str(&format!("- contact         : {}\n", contact_line(p.out_contact.as_ref())));
    out.push_str(&format!("- partner contact : {}\n", contact_line(p.out_partner_contact.as_ref())));
    out.push_str(&format!("- funding         : {}\n", funding_line(p.out_funding.as_ref())));

    out.push_str("Incoming\n");
    out.push_str(&format!("- contact         : {}\n", contact_line(p.in_contact.as_ref())));
    out.push_str(&format!("- portal          : {}\n", or_dash(p.in_portal.as_deref())));

    out.push_str("Staff\n");
    out.push_str(&format!("- contact name    : {}\n", or_dash(p.staff_contact_name.as_deref())));
    out.push_str(&format!("- UCL contact     : {}\n", contact_line(p.ucl_contact.as_ref())));
    out.push_str(&format!("- partner contact : {}\n", contact_line(p.staff_partner_contact.as_ref())));
    out.push_str(&format!("- funding         : {}\n", funding_line(p.staff_funding.as_ref())));
    out
}

pub fn format_page_info(info: &PageInfo) -> String {
    if info.total_pages == 0 {
        return format!("{} result(s)\n", info.total_elements);
    }
    format!(
        "page {}/{} | {} result(s)\n",
        info.page_number + 1,
        info.total_pages,
        info.total_elements
    )
}

/// Option list as `id<TAB>label` lines.
pub fn format_options(items: &[ValueLabel]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&format!("{}\t{}\n", item.id, item.label));
    }
    out
}

pub fn format_checkboxes(items: &[CheckboxItem]) -> String {
    let mut out = String::new();
    for item in items {
        let mark = if item.checked { "x" } else { " " };
        out.push_str(&format!("[{mark}] {}\n", item.label));
    }
    out
}

/// Parameter record as `key=value` lines.
pub fn format_params(title: &str, params: &SearchParams) -> String {
    let mut out = format!("{title}:\n");
    let pairs = params.to_pairs();
    if pairs.is_empty() {
        out.push_str("  (none)\n");
    }
    for (key, value) in pairs {
        out.push_str(&format!("  {key}={value}\n"));
    }
    out
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(DASH)
}

/// `Name <email> (phone)`, or a dash when nothing is known.
fn contact_line(contact: Option<&Contact>) -> String {
    let Some(c) = contact else {
        return DASH.to_string();
    };
    let mut parts = Vec::new();
    let name = c.full_name();
    if !name.is_empty() {
        parts.push(name);
    }
    if let Some(email) = c.email.as_deref().filter(|e| !e.is_empty()) {
        parts.push(format!("<{email}>"));
    }
    if let Some(phone) = c.phone.as_deref().filter(|p| !p.is_empty()) {
        parts.push(format!("({phone})"));
    }
    if parts.is_empty() { DASH.to_string() } else { parts.join(" ") }
}

fn funding_line(funding: Option<&Funding>) -> String {
    let Some(f) = funding else {
        return DASH.to_string();
    };
    match (f.name.as_deref().filter(|n| !n.is_empty()), f.url.as_deref().filter(|u| !u.is_empty())) {
        (Some(name), Some(url)) => format!("{name} ({url})"),
        (Some(name), None) => name.to_string(),
        (None, Some(url)) => url.to_string(),
        (None, None) => DASH.to_string(),
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MobilityFlags;
    use crate::query::{RawQuery, partnership_params};

    fn partner(name: &str) -> Partner {
        Partner {
            uuid: "p-1".into(),
            name: name.into(),
            city: Some("Leuven".into()),
            country: Some("BE".into()),
            ..Partner::default()
        }
    }

    #[test]
    fn partners_table_lists_rows_and_page() {
        let page = Paginated {
            count: 30,
            next: None,
            previous: None,
            results: vec![partner("KU Leuven")],
        };
        let out = format_partners(&page, &PageInfo::from_envelope(30, 25, 25));
        assert!(out.contains("KU Leuven"));
        assert!(out.contains("Leuven"));
        assert!(out.ends_with("page 2/2 | 30 result(s)\n"));
    }

    #[test]
    fn partnerships_table_shows_mobility() {
        let page = Paginated {
            count: 1,
            next: None,
            previous: None,
            results: vec![Partnership {
                partner: partner("KU Leuven"),
                mobility: MobilityFlags {
                    is_sta: true,
                    ..MobilityFlags::default()
                },
                ..Partnership::default()
            }],
        };
        let out = format_partnerships(&page, &PageInfo::from_envelope(1, 0, 25));
        assert!(out.contains("Staff"));
    }

    #[test]
    fn empty_results_are_flagged() {
        let page: Paginated<Partner> = Paginated {
            count: 0,
            next: None,
            previous: None,
            results: vec![],
        };
        let out = format_partners(&page, &PageInfo::from_envelope(0, 0, 25));
        assert!(out.contains("(no partners)"));
        assert!(out.ends_with("0 result(s)\n"));
    }

    #[test]
    fn partnership_detail_lists_mobility_sections() {
        let p = Partnership {
            partner: partner("KU Leuven"),
            ucl_university: Some("EPL".into()),
            out_education_level: Some("Master".into()),
            out_contact: Some(Contact {
                first_name: Some("Ann".into()),
                last_name: Some("Peeters".into()),
                email: Some("ann@example.org".into()),
                ..Contact::default()
            }),
            out_funding: Some(Funding {
                name: Some("Erasmus+".into()),
                url: None,
            }),
            staff_funding: Some(Funding {
                name: None,
                url: Some("https://fame.example".into()),
            }),
            ..Partnership::default()
        };
        let out = format_partnership_detail(&p);
        assert!(out.starts_with("EPL / KU Leuven\n"));
        assert!(out.contains("- education level : Master\n"));
        assert!(out.contains("- contact         : Ann Peeters <ann@example.org>\n"));
        assert!(out.contains("- funding         : Erasmus+\n"));
        assert!(out.contains("- funding         : https://fame.example\n"));
        assert!(out.contains("Incoming\n- contact         : -\n"));
        assert!(out.contains("- status         : -\n"));
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }

    #[test]
    fn params_block_lists_pairs() {
        let params = partnership_params(&RawQuery::parse("country=BE"));
        assert_eq!(
            format_params("partnerships", &params),
            "partnerships:\n  country=BE\n  ordering=ucl_entity\n"
        );
    }

    #[test]
    fn checkboxes_render_marks() {
        let items = vec![CheckboxItem::new("a", "A", true), CheckboxItem::new("b", "B", false)];
        assert_eq!(format_checkboxes(&items), "[x] A\n[ ] B\n");
    }
}
