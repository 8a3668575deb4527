use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rounds_core::sedation;
use rounds_core::ventilation::VentilationSummary;
use rounds_core::{consult, fluids, scores, seed};
use rounds_core::{CensusStore, PatientCensus};
use rounds_types::{ChartValue, Rass};

#[derive(Parser)]
#[command(name = "rounds")]
#[command(about = "ICU bedside rounds dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List tracked patients
    List,
    /// Admit a new patient and make it active
    Add {
        /// Bed label for the new patient
        #[arg(long)]
        bed: Option<String>,
    },
    /// Make a patient the active one
    Select {
        /// Patient id
        id: String,
    },
    /// Full derived report for a patient (the active one when omitted)
    Show {
        /// Patient id
        id: Option<String>,
    },
    /// Discharge a patient
    Remove {
        /// Patient id
        id: String,
    },
    /// Update sedation fields and recompute infusion rates
    Sedation {
        /// Patient id
        id: String,
        /// Dosing weight, kg
        #[arg(long)]
        weight: Option<f64>,
        /// Current RASS level (-5..=+4)
        #[arg(long, allow_hyphen_values = true)]
        rass: Option<i64>,
        /// Fentanyl dose, mcg/kg/h
        #[arg(long)]
        fentanyl_dose: Option<f64>,
        /// Fentanyl syringe concentration, mcg/mL
        #[arg(long)]
        fentanyl_conc: Option<f64>,
        /// Propofol dose, mg/kg/h
        #[arg(long)]
        propofol_dose: Option<f64>,
        /// Propofol syringe concentration, mg/mL
        #[arg(long)]
        propofol_conc: Option<f64>,
        /// Dexmedetomidine dose, mcg/kg/h
        #[arg(long)]
        dex_dose: Option<f64>,
        /// Dexmedetomidine syringe concentration, mcg/mL
        #[arg(long)]
        dex_conc: Option<f64>,
        /// Midazolam dose, mg/kg/h
        #[arg(long)]
        midazolam_dose: Option<f64>,
        /// Midazolam syringe concentration, mg/mL
        #[arg(long)]
        midazolam_conc: Option<f64>,
    },
    /// Print the consult prompt handed to the external AI service
    Consult {
        /// Patient id
        id: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rounds=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let store = CensusStore::from_env();

    let mut census = match store.load() {
        Ok(Some(census)) => census,
        Ok(None) => {
            tracing::info!("no saved census, starting from the example data");
            seed::example_census()
        }
        Err(e) => {
            tracing::warn!("could not load saved census ({e}), starting from the example data");
            seed::example_census()
        }
    };

    match cli.command {
        Some(Commands::List) | None => {
            if census.is_empty() {
                println!("No patients tracked.");
            }
            for (id, record) in census.iter() {
                let marker = if census.active_id() == Some(id) { "*" } else { " " };
                let name = if record.name.is_empty() { "(unnamed)" } else { &record.name };
                println!(
                    "{marker} {id}  {bed}  {name}  ICU day {day}  SOFA {sofa}",
                    bed = record.bed,
                    day = record.icu_day,
                    sofa = scores::sofa_total(record),
                );
            }
        }
        Some(Commands::Add { bed }) => {
            let id = census.add();
            if let Some(bed) = bed {
                census.update(&id, |record| record.bed = bed);
            }
            store.save(&census)?;
            println!("Admitted {id}");
        }
        Some(Commands::Select { id }) => {
            census.select(&id);
            store.save(&census)?;
            match census.active_id() {
                Some(active) => println!("Active patient: {active}"),
                None => println!("No active patient."),
            }
        }
        Some(Commands::Show { id }) => {
            let (id, record) = resolve(&census, id.as_deref())?;
            print_report(id, record);
        }
        Some(Commands::Remove { id }) => {
            census.remove(&id);
            store.save(&census)?;
            match census.active_id() {
                Some(active) => println!("Removed {id}; active patient is now {active}"),
                None => println!("Removed {id}; census is empty"),
            }
        }
        Some(Commands::Sedation {
            id,
            weight,
            rass,
            fentanyl_dose,
            fentanyl_conc,
            propofol_dose,
            propofol_conc,
            dex_dose,
            dex_conc,
            midazolam_dose,
            midazolam_conc,
        }) => {
            let rass = rass.map(Rass::new).transpose()?;
            census.update(&id, |record| {
                if let Some(weight) = weight {
                    record.weight_kg = ChartValue::Num(weight);
                }
                if let Some(rass) = rass {
                    record.rass = ChartValue::Num(f64::from(rass.value()));
                }
                set_dose(&mut record.fentanyl_dose, &mut record.fentanyl_concentration, fentanyl_dose, fentanyl_conc);
                set_dose(&mut record.propofol_dose, &mut record.propofol_concentration, propofol_dose, propofol_conc);
                set_dose(&mut record.dexmedetomidine_dose, &mut record.dexmedetomidine_concentration, dex_dose, dex_conc);
                set_dose(&mut record.midazolam_dose, &mut record.midazolam_concentration, midazolam_dose, midazolam_conc);
                // The one write path of the engine: rates recomputed here so
                // the census owns the mutation.
                sedation::recompute_infusions(record);
                record.last_sedation_check = Some(Utc::now());
            });
            store.save(&census)?;

            if let Some(record) = census.get(&id) {
                for drug in sedation::DRUGS {
                    let state = sedation::drug_state(record, drug);
                    if state.dose > 0.0 {
                        println!(
                            "{name}: {dose} {unit} -> {rate} mL/h",
                            name = drug.name(),
                            dose = state.dose,
                            unit = drug.dose_unit(),
                            rate = state.infusion_ml_h,
                        );
                    }
                }
            } else {
                println!("No patient {id}");
            }
        }
        Some(Commands::Consult { id }) => {
            let (_, record) = resolve(&census, id.as_deref())?;
            println!("{}", consult::build_prompt(record, Utc::now()));
        }
    }

    Ok(())
}

fn set_dose(
    dose_field: &mut ChartValue,
    conc_field: &mut ChartValue,
    dose: Option<f64>,
    conc: Option<f64>,
) {
    if let Some(dose) = dose {
        *dose_field = ChartValue::Num(dose);
    }
    if let Some(conc) = conc {
        *conc_field = ChartValue::Num(conc);
    }
}

fn resolve<'a>(
    census: &'a PatientCensus,
    id: Option<&'a str>,
) -> anyhow::Result<(&'a str, &'a rounds_core::PatientRecord)> {
    match id {
        Some(id) => census
            .get(id)
            .map(|record| (id, record))
            .ok_or_else(|| anyhow::anyhow!("no patient with id {id}")),
        None => census
            .active()
            .ok_or_else(|| anyhow::anyhow!("no active patient")),
    }
}

fn print_report(id: &str, record: &rounds_core::PatientRecord) {
    let name = if record.name.is_empty() { "(unnamed)" } else { &record.name };
    println!("{bed} - {name}  [{id}]", bed = record.bed);
    println!(
        "{diagnosis}, ICU day {day}, admitted {date}",
        diagnosis = record.main_diagnosis,
        day = record.icu_day,
        date = record.admission_date,
    );

    println!("\nScores");
    println!("  SOFA     {}", scores::sofa_total(record));
    println!("  GCS      {}", scores::gcs_total(record));
    let qsofa = scores::qsofa_total(record);
    println!("  qSOFA    {qsofa} ({})", scores::qsofa_risk(qsofa));
    let curb = scores::curb65_total(record);
    println!("  CURB-65  {curb} ({})", scores::curb65_disposition(curb));
    println!("  MEWS     {}", scores::mews_total(record));
    println!("  NUTRIC   {}", scores::nutric_total(record));
    println!("  Charlson {}", scores::charlson_total(record));

    let vent = VentilationSummary::from_record(record);
    println!("\nVentilation ({})", record.vent_mode);
    println!("  Driving pressure   {:.0} cmH2O", vent.driving_pressure);
    match vent.ards {
        Some(ards) => println!("  P/F ratio          {:.0} ({ards})", vent.pf_ratio),
        None => println!("  P/F ratio          --"),
    }
    if vent.ideal_body_weight > 0.0 {
        println!(
            "  IBW                {:.1} kg (protective TV {:.0}-{:.0} mL)",
            vent.ideal_body_weight,
            vent.protective_volumes.lower_ml,
            vent.protective_volumes.upper_ml,
        );
    }
    if vent.dynamic_compliance > 0.0 {
        println!("  Dynamic compliance {:.1} mL/cmH2O", vent.dynamic_compliance);
    }
    if vent.airway_resistance > 0.0 {
        println!("  Airway resistance  {:.1} cmH2O/L/s", vent.airway_resistance);
    }
    if vent.minute_ventilation > 0.0 {
        println!("  Minute ventilation {:.1} L/min", vent.minute_ventilation);
    }
    if let Some(oi) = vent.oi_severity {
        println!("  Oxygenation index  {:.1} ({oi})", vent.oxygenation_index);
    }

    let balance = fluids::daily_balance(record);
    println!("\nFluid balance");
    println!("  Intake 24h  {:.0} mL", balance.intake_ml);
    println!("  Output 24h  {:.0} mL", balance.output_ml);
    println!(
        "  Net 24h     {:.0} mL ({tier}, {trend})",
        balance.net_ml,
        tier = fluids::classify_magnitude(balance.net_ml),
        trend = fluids::classify_trend(balance.net_ml),
    );
    if !record.cumulative_balance.is_empty() {
        println!("  Cumulative  {}", record.cumulative_balance);
    }

    let sed = sedation::SedationSummary::from_record(record);
    println!("\nSedation/analgesia");
    println!("  RASS {} ({:?}), CPOT {}/8 ({:?})", sed.rass, sed.rass_band, sed.cpot_total, sed.cpot_reading);
    println!("  Status {:?}, dosing weight {:.1} kg", sed.status, sed.dosing_weight_kg);
    println!("  PADIS advice: {:?} (priority {:?})", sed.advice, sed.advice.priority());
    for action in sed.advice.actions() {
        println!("    - {action}");
    }
    for drug in sedation::DRUGS {
        let state = sedation::drug_state(record, drug);
        if state.dose > 0.0 {
            println!(
                "  {name} {dose} {unit} via {conc} {cunit}: {rate} mL/h ({band:?})",
                name = drug.name(),
                dose = state.dose,
                unit = drug.dose_unit(),
                conc = state.concentration,
                cunit = drug.concentration_unit(),
                rate = state.infusion_ml_h,
                band = sedation::classify_dose(drug, state.dose),
            );
        }
    }
}
