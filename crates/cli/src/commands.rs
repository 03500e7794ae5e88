//! Page commands shared by one-shot invocations and the interactive shell.

use crate::render::{self, Palette};
use clap::{Args, Subcommand, ValueEnum};
use healthrecs_core::auth::Page;
use healthrecs_core::context::AppContext;
use healthrecs_core::directory::{SearchField, SearchOutcome, Tab};
use healthrecs_core::error::ApiAction;
use healthrecs_core::models::{Ailment, NewVisit};
use healthrecs_core::notice::Notice;
use healthrecs_core::pages::dashboard::{quick_links, DashboardPage};
use healthrecs_core::pages::detail::load_detail;
use healthrecs_core::pages::extraction::{extraction_failed_notice, ExtractionHelper};
use healthrecs_core::pages::failure_notice;
use healthrecs_core::pages::patients::PatientsPage;
use healthrecs_core::pages::registration::{PatientForm, RegistrationWizard, WizardState};
use healthrecs_core::pages::reports::{build_report, ReportKind};
use healthrecs_core::pages::treatment::TreatmentPage;
use healthrecs_core::pages::visit::VisitForm;
use healthrecs_core::theme::Theme;
use healthrecs_core::{RecordsError, RecordsResult};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum PageCommand {
    /// Show headline counts and the most recent registrations
    Dashboard {
        /// Search the fetched patients instead of listing recent ones
        #[arg(long)]
        search: Option<String>,
        /// Field to search: name, aadhar, regNo or phone
        #[arg(long, default_value = "name")]
        by: SearchField,
    },
    /// List patients by triage tab, or search them
    Patients {
        /// Tab: all, critical, followup or stable
        #[arg(long, default_value = "all")]
        tab: Tab,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "name")]
        by: SearchField,
    },
    /// Show one patient's record and visit history
    Show {
        /// Registration number
        reg_no: String,
    },
    /// Register a new patient
    Register(RegisterArgs),
    /// Append a visit to a patient
    AddVisit {
        /// Registration number
        reg_no: String,
        #[arg(long)]
        investigation: String,
        #[arg(long)]
        treatment: String,
    },
    /// Find a patient and optionally record a treatment visit
    Treatment {
        #[arg(long)]
        search: String,
        #[arg(long, default_value = "name")]
        by: SearchField,
        #[arg(long, requires = "treatment")]
        investigation: Option<String>,
        #[arg(long, requires = "investigation")]
        treatment: Option<String>,
    },
    /// Extract registration data from an image of a patient card
    Extract {
        /// Path to the image
        path: PathBuf,
    },
    /// Generate a report
    Report {
        /// monthly, disease, demographics, treatment or history
        kind: ReportKind,
        /// Patient for the medical history report
        #[arg(long)]
        reg_no: Option<String>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show, toggle or set the colour theme
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
    /// Show the signed-in user and their menu
    Whoami,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Toggle,
    Light,
    Dark,
}

#[derive(Args, Debug, Default)]
pub struct RegisterArgs {
    /// Prefill the form from an image before applying the flags below
    #[arg(long)]
    pub from_image: Option<PathBuf>,
    /// Print the assembled form and stop without submitting
    #[arg(long)]
    pub dry_run: bool,
    #[arg(long)]
    pub reg_no: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub dob: Option<String>,
    #[arg(long)]
    pub age: Option<String>,
    /// M, F or free text
    #[arg(long)]
    pub sex: Option<String>,
    #[arg(long)]
    pub caste: Option<String>,
    #[arg(long)]
    pub mothers_name: Option<String>,
    #[arg(long)]
    pub relatives: Option<String>,
    #[arg(long)]
    pub previous_occupation: Option<String>,
    #[arg(long)]
    pub date_of_admission: Option<String>,
    #[arg(long)]
    pub mobile_no: Option<String>,
    #[arg(long)]
    pub aadhar_no: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub blood_group: Option<String>,
    /// Leprosy classification (MB or PB)
    #[arg(long)]
    pub mb_or_pb_status: Option<String>,
    #[arg(long)]
    pub deformity_status: Option<String>,
    #[arg(long)]
    pub duration_of_disease: Option<String>,
    #[arg(long)]
    pub disability_status: Option<String>,
    /// Ailment key, e.g. hypertension (repeatable)
    #[arg(long = "ailment")]
    pub ailments: Vec<String>,
    /// Investigation for a first visit recorded with the registration
    #[arg(long)]
    pub visit_investigation: Option<String>,
    /// Treatment for a first visit recorded with the registration
    #[arg(long)]
    pub visit_treatment: Option<String>,
}

impl RegisterArgs {
    /// Write every provided flag over `form`.
    fn overlay(&self, form: &mut PatientForm) -> RecordsResult<()> {
        let fields = [
            (&self.reg_no, &mut form.reg_no),
            (&self.name, &mut form.name),
            (&self.dob, &mut form.dob),
            (&self.age, &mut form.age),
            (&self.sex, &mut form.sex),
            (&self.caste, &mut form.caste),
            (&self.mothers_name, &mut form.mothers_name),
            (&self.relatives, &mut form.relatives),
            (&self.previous_occupation, &mut form.previous_occupation),
            (&self.date_of_admission, &mut form.date_of_admission),
            (&self.mobile_no, &mut form.mobile_no),
            (&self.aadhar_no, &mut form.aadhar_no),
            (&self.address, &mut form.address),
            (&self.blood_group, &mut form.blood_group),
            (&self.mb_or_pb_status, &mut form.mb_or_pb_status),
            (&self.deformity_status, &mut form.deformity_status),
            (&self.duration_of_disease, &mut form.duration_of_disease),
            (&self.disability_status, &mut form.disability_status),
        ];
        for (flag, field) in fields {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }

        for key in &self.ailments {
            let ailment = Ailment::from_key(key.trim())
                .ok_or_else(|| RecordsError::InvalidInput(format!("unknown ailment: {key}")))?;
            form.other_ailments.set(ailment, true);
        }

        if self.visit_investigation.is_some() || self.visit_treatment.is_some() {
            form.first_visit = Some(NewVisit {
                investigation: self.visit_investigation.clone().unwrap_or_default(),
                treatment_given: self.visit_treatment.clone().unwrap_or_default(),
            });
        }
        Ok(())
    }
}

impl PageCommand {
    fn page(&self) -> Option<Page> {
        match self {
            PageCommand::Dashboard { .. } => Some(Page::Dashboard),
            PageCommand::Patients { .. } => Some(Page::Patients),
            PageCommand::Show { .. } | PageCommand::AddVisit { .. } => Some(Page::PatientDetail),
            PageCommand::Register(_) | PageCommand::Extract { .. } => Some(Page::NewPatient),
            PageCommand::Treatment { .. } => Some(Page::Treatment),
            PageCommand::Report { .. } => Some(Page::Reports),
            PageCommand::Whoami => Some(Page::Dashboard),
            PageCommand::Theme { .. } => None,
        }
    }

    /// Whether the command works without a signed-in user.
    pub fn is_public(&self) -> bool {
        self.page().is_none()
    }

    fn action(&self) -> ApiAction {
        match self {
            PageCommand::Register(args) if !args.dry_run => ApiAction::Save,
            PageCommand::AddVisit { .. } => ApiAction::Save,
            PageCommand::Treatment {
                investigation: Some(_),
                ..
            } => ApiAction::Save,
            _ => ApiAction::Load,
        }
    }
}

/// Run `command` and print its output. Failures are printed as a notice.
///
/// Returns whether the command succeeded.
pub async fn run(ctx: &mut AppContext, command: PageCommand) -> bool {
    let action = command.action();
    let extracting = matches!(command, PageCommand::Extract { .. })
        || matches!(&command, PageCommand::Register(args) if args.from_image.is_some());

    match execute(ctx, command).await {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("command failed: {:?}", e);
            let notice = match &e {
                RecordsError::Api(_) if extracting => extraction_failed_notice(),
                RecordsError::PatientNotFound => Notice::error("Patient not found")
                    .with_description("No patient matches the search criteria."),
                other => failure_notice(other, action),
            };
            eprintln!("{}", render::notice(palette(ctx), &notice));
            false
        }
    }
}

pub fn palette(ctx: &AppContext) -> Palette {
    Palette::new(ctx.theme().current())
}

async fn execute(ctx: &mut AppContext, command: PageCommand) -> RecordsResult<()> {
    let user = match command.page() {
        Some(page) => Some(ctx.open(page)?.clone()),
        None => None,
    };
    let palette = palette(ctx);

    match command {
        PageCommand::Dashboard { search, by } => {
            let mut page = DashboardPage::new(ctx.cfg());
            page.load(ctx.records()).await?;
            match search.as_deref().map(|q| page.search(q, by)) {
                Some(SearchOutcome::Results(found)) => {
                    println!("{} result(s) for {}", found.len(), by.label());
                    println!("{}", render::patient_list(palette, &found));
                }
                Some(SearchOutcome::Inactive) | None => {
                    let user = user.ok_or(RecordsError::NotAuthenticated)?;
                    let links = quick_links(user.role);
                    print!(
                        "{}",
                        render::dashboard(palette, &user, page.stats(), &page.recent(), &links)
                    );
                }
            }
        }
        PageCommand::Patients { tab, search, by } => {
            let mut page = PatientsPage::new();
            page.load(ctx.records()).await?;
            page.select_tab(tab);
            if let Some(query) = search {
                page.search(&query, by);
            }
            if !page.is_searching() {
                println!("{}", render::tab_bar(palette, page.tab(), &page.tab_counts()));
            }
            println!("{}", render::patient_list(palette, &page.displayed()));
        }
        PageCommand::Show { reg_no } => {
            let view = load_detail(ctx.records(), &reg_no).await?;
            print!("{}", render::detail(palette, &view));
        }
        PageCommand::Register(args) => {
            let mut wizard = RegistrationWizard::new();
            if let Some(path) = &args.from_image {
                let mut helper = ExtractionHelper::new();
                let preview = helper.select_file(path).await?;
                eprintln!("Uploading {}", render::preview(&preview));
                helper.upload(ctx.extraction()).await?;
                if let Some(form) = helper.use_data() {
                    let notice = wizard.apply_extracted(form);
                    eprintln!("{}", render::notice(palette, &notice));
                }
            }
            args.overlay(wizard.form_mut())?;
            wizard.go_to(3);

            if args.dry_run {
                print!("{}", render::form_review(palette, wizard.form()));
                wizard.form().to_patient()?;
                return Ok(());
            }

            let notice = wizard.submit(ctx.records()).await?;
            eprintln!("{}", render::notice(palette, &notice));
            if let WizardState::Confirmed { reg_no } = wizard.state() {
                println!("{}", render::confirmation(palette, reg_no));
            }
        }
        PageCommand::AddVisit {
            reg_no,
            investigation,
            treatment,
        } => {
            let mut form = VisitForm::new(Some(&reg_no));
            form.investigation = investigation;
            form.treatment_given = treatment;
            let notice = form.submit(ctx.records()).await?;
            println!("{}", render::notice(palette, &notice));
        }
        PageCommand::Treatment {
            search,
            by,
            investigation,
            treatment,
        } => {
            let mut page = TreatmentPage::new();
            page.load(ctx.records()).await?;
            let (patient, mut form) = page.find(&search, by)?;
            println!("{}", render::patient_card(palette, patient));

            if let (Some(investigation), Some(treatment)) = (investigation, treatment) {
                form.investigation = investigation;
                form.treatment_given = treatment;
                let notice = form.submit(ctx.records()).await?;
                println!("{}", render::notice(palette, &notice));
            }
        }
        PageCommand::Extract { path } => {
            let mut helper = ExtractionHelper::new();
            let preview = helper.select_file(&path).await?;
            eprintln!("Uploading {}", render::preview(&preview));
            helper.upload(ctx.extraction()).await?;
            if let Some(form) = helper.use_data() {
                print!("{}", render::form_review(palette, &form));
            }
        }
        PageCommand::Report {
            kind,
            reg_no,
            json,
        } => {
            let report = build_report(ctx.records(), kind, reg_no.as_deref()).await?;
            if json {
                let out = serde_json::to_string_pretty(&report)
                    .map_err(RecordsError::Serialization)?;
                println!("{out}");
            } else {
                print!("{report}");
            }
        }
        PageCommand::Theme { action } => {
            let themes = ctx.theme_mut();
            let theme = match action {
                None => themes.current(),
                Some(ThemeAction::Toggle) => themes.toggle()?,
                Some(ThemeAction::Light) => themes.set(Theme::Light)?,
                Some(ThemeAction::Dark) => themes.set(Theme::Dark)?,
            };
            println!("Theme: {theme}");
        }
        PageCommand::Whoami => {
            let user = user.ok_or(RecordsError::NotAuthenticated)?;
            println!("{} ({})", user.name, user.username);
            println!("Role: {}", user.role);
            if let Some(department) = &user.department {
                println!("Department: {department}");
            }
            println!(
                "{}",
                render::nav(palette, &healthrecs_core::auth::nav_items(user.role))
            );
        }
    }
    Ok(())
}
