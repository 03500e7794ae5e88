//! Terminal rendering of page view data.
//!
//! Renderers build a `String` so the shell and one-shot commands print the same
//! thing. Colours follow the active theme.

use colored::{ColoredString, Colorize};
use healthrecs_core::auth::{NavItem, User};
use healthrecs_core::condition::{CardStatus, Condition};
use healthrecs_core::dates::format_visit_date;
use healthrecs_core::directory::{Tab, TabCounts};
use healthrecs_core::models::{AilmentTone, Patient};
use healthrecs_core::notice::{Notice, NoticeLevel};
use healthrecs_core::pages::dashboard::{DashboardStats, NO_RECENT_PATIENTS};
use healthrecs_core::pages::detail::PatientDetailView;
use healthrecs_core::pages::extraction::ImagePreview;
use healthrecs_core::pages::registration::{PatientForm, Step};
use healthrecs_core::theme::Theme;
use std::fmt::Write;

#[derive(Clone, Copy, Debug)]
pub struct Palette {
    theme: Theme,
}

impl Palette {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    fn heading(&self, text: &str) -> ColoredString {
        match self.theme {
            Theme::Light => text.blue().bold(),
            Theme::Dark => text.bright_cyan().bold(),
        }
    }

    fn muted(&self, text: &str) -> ColoredString {
        match self.theme {
            Theme::Light => text.dimmed(),
            Theme::Dark => text.bright_black(),
        }
    }

    fn status(&self, status: CardStatus) -> ColoredString {
        let label = status.label();
        match (status, self.theme) {
            (CardStatus::Condition(Condition::Critical), _) => label.red().bold(),
            (CardStatus::Condition(Condition::FollowUp), Theme::Light) => label.yellow(),
            (CardStatus::Condition(Condition::FollowUp), Theme::Dark) => label.bright_yellow(),
            (CardStatus::Condition(Condition::Stable), Theme::Light) => label.green(),
            (CardStatus::Condition(Condition::Stable), Theme::Dark) => label.bright_green(),
            (CardStatus::New, _) => label.magenta(),
        }
    }

    fn tone(&self, label: &str, tone: AilmentTone) -> ColoredString {
        match tone {
            AilmentTone::Critical => label.red(),
            AilmentTone::Warning => label.yellow(),
            AilmentTone::Normal => self.muted(label),
        }
    }
}

pub fn notice(palette: Palette, notice: &Notice) -> String {
    let title = match notice.level {
        NoticeLevel::Success => notice.title.green().bold(),
        NoticeLevel::Info => palette.heading(&notice.title),
        NoticeLevel::Warning => notice.title.yellow().bold(),
        NoticeLevel::Error => notice.title.red().bold(),
    };
    match &notice.description {
        Some(description) => format!("{title}\n  {}", palette.muted(description)),
        None => title.to_string(),
    }
}

/// One patient card: name, registration number, status and last visit.
pub fn patient_card(palette: Palette, patient: &Patient) -> String {
    let age = patient
        .age
        .map(|a| format!("{a} yrs"))
        .unwrap_or_else(|| "age ?".to_string());
    let mut out = format!(
        "{}  {}  {}, {}  [{}]",
        patient.name.bold(),
        palette.muted(&patient.reg_no),
        age,
        patient.sex_label(),
        palette.status(CardStatus::for_patient(patient)),
    );
    if let Some(visit) = patient.last_visit() {
        let _ = write!(
            out,
            "\n    Last visit {}: {}",
            format_visit_date(visit.date.as_deref()),
            visit.treatment_given
        );
    }
    out
}

pub fn patient_list(palette: Palette, patients: &[&Patient]) -> String {
    if patients.is_empty() {
        return palette.muted("No patients found.").to_string();
    }
    patients
        .iter()
        .map(|p| patient_card(palette, p))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn dashboard(
    palette: Palette,
    user: &User,
    stats: DashboardStats,
    recent: &[&Patient],
    links: &[NavItem],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", palette.heading("Dashboard"));
    let _ = writeln!(out, "Welcome, {} ({})", user.name, user.role);
    let _ = writeln!(out);
    let _ = writeln!(out, "  Total Patients       {}", stats.total);
    let _ = writeln!(out, "  Critical Attention   {}", stats.critical.to_string().red());
    let _ = writeln!(out, "  Follow-up Required   {}", stats.follow_up.to_string().yellow());
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", palette.heading("Recent Patients"));
    if recent.is_empty() {
        let _ = writeln!(out, "{}", palette.muted(NO_RECENT_PATIENTS));
    } else {
        let _ = writeln!(out, "{}", patient_list(palette, recent));
    }
    if !links.is_empty() {
        let _ = writeln!(out);
        let labels: Vec<String> = links
            .iter()
            .map(|l| format!("{} ({})", l.label, l.path))
            .collect();
        let _ = writeln!(out, "Quick links: {}", labels.join(", "));
    }
    out
}

pub fn tab_bar(palette: Palette, selected: Tab, counts: &TabCounts) -> String {
    Tab::ALL
        .iter()
        .map(|tab| {
            let label = format!("{} ({})", tab.label(), counts.get(*tab));
            if *tab == selected {
                palette.heading(&label).to_string()
            } else {
                palette.muted(&label).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn detail(palette: Palette, view: &PatientDetailView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  [{}]", palette.heading(&view.name), palette.status(view.status));
    let _ = writeln!(out, "Reg No: {}", view.reg_no);
    let _ = writeln!(out, "{}", view.age_sex);
    let _ = writeln!(out, "Blood group: {}", view.blood_group);
    let _ = writeln!(out, "Leprosy classification: {}", view.leprosy_class);
    let _ = writeln!(out, "Mobile: {}", view.mobile_no);
    let _ = writeln!(out, "Address: {}", view.address);

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", palette.heading("Other Ailments"));
    if view.ailments.is_empty() {
        let _ = writeln!(out, "{}", palette.muted("None recorded"));
    } else {
        let badges: Vec<String> = view
            .ailments
            .iter()
            .map(|a| palette.tone(&a.label, a.tone).to_string())
            .collect();
        let _ = writeln!(out, "{}", badges.join(", "));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", palette.heading("Visit History"));
    if view.visits.is_empty() {
        let _ = writeln!(out, "{}", palette.muted("No visits recorded."));
    }
    for visit in &view.visits {
        let _ = writeln!(out, "{}", visit.date.bold());
        let _ = writeln!(out, "  Investigation: {}", visit.investigation);
        let _ = writeln!(out, "  Treatment: {}", visit.treatment_given);
    }
    out
}

/// The registration form laid out by wizard step.
pub fn form_review(palette: Palette, form: &PatientForm) -> String {
    let value = |field: &str| -> String {
        match field {
            "regNo" => form.reg_no.clone(),
            "name" => form.name.clone(),
            "dob" => form.dob.clone(),
            "age" => form.age.clone(),
            "sex" => form.sex.clone(),
            "caste" => form.caste.clone(),
            "mothersName" => form.mothers_name.clone(),
            "relatives" => form.relatives.clone(),
            "previousOccupation" => form.previous_occupation.clone(),
            "dateOfAdmission" => form.date_of_admission.clone(),
            "mobileNo" => form.mobile_no.clone(),
            "aadharNo" => form.aadhar_no.clone(),
            "address" => form.address.clone(),
            "bloodGroup" => form.blood_group.clone(),
            "mbOrPbStatus" => form.mb_or_pb_status.clone(),
            "deformityStatus" => form.deformity_status.clone(),
            "durationOfDisease" => form.duration_of_disease.clone(),
            "disablitiyStatus" => form.disability_status.clone(),
            "otherAilments" => form
                .other_ailments
                .active()
                .into_iter()
                .map(|a| a.label)
                .collect::<Vec<_>>()
                .join(", "),
            _ => String::new(),
        }
    };

    let mut out = String::new();
    for step in [Step::Personal, Step::Contact, Step::Medical] {
        let _ = writeln!(
            out,
            "{}",
            palette.heading(&format!("Step {}: {}", step.number(), step.title()))
        );
        for field in step.fields() {
            let _ = writeln!(out, "  {:<20} {}", field, value(field));
        }
    }
    if let Some(visit) = &form.first_visit {
        let _ = writeln!(out, "{}", palette.heading("First visit"));
        let _ = writeln!(out, "  {:<20} {}", "investigation", visit.investigation);
        let _ = writeln!(out, "  {:<20} {}", "treatmentGiven", visit.treatment_given);
    }
    out
}

pub fn confirmation(palette: Palette, reg_no: &str) -> String {
    format!(
        "{}\nThe patient has been successfully registered in the system\nRegistration number: {}",
        palette.heading("Registration Complete"),
        reg_no.bold()
    )
}

pub fn preview(preview: &ImagePreview) -> String {
    format!(
        "{} ({}, {} bytes)",
        preview.file_name, preview.mime_type, preview.size
    )
}

pub fn nav(palette: Palette, items: &[NavItem]) -> String {
    items
        .iter()
        .map(|item| format!("  {:<12} {}", item.label, palette.muted(item.path)))
        .collect::<Vec<_>>()
        .join("\n")
}
