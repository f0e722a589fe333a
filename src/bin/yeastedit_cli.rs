use anyhow::{Context, Result, anyhow, bail};
use env_logger::Env;
use serde::Serialize;
use std::env;
use yeastedit::{
    about,
    cas9_site::{Cas9Site, SPACER_LENGTH},
    efficiency::calculate_efficiency_score,
    gene::GeneInfo,
    parameters::DesignParameters,
    repair_template::{DesignRequest, RepairResult, generate_repair_templates},
};

const DEFAULT_PARAMS_PATH: &str = ".yeastedit.json";

#[derive(Serialize)]
struct SiteSummary {
    position: usize,
    strand: String,
    guide_with_pam: String,
    pam: String,
    distance: usize,
    score: u8,
}

fn usage() {
    eprintln!(
        "Usage:\n  \
  yeastedit_cli --version\n  \
  yeastedit_cli [--params PATH] design GENE.fa RESIDUE AA [--oligo-length N] [--text]\n  \
  yeastedit_cli [--params PATH] sites GENE.fa RESIDUE\n  \
  yeastedit_cli score GUIDE_WITH_PAM\n\n  \
  GENE.fa holds the coding sequence; only its first record is used"
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Could not serialize JSON output")?;
    println!("{text}");
    Ok(())
}

fn parse_global_params_arg(args: &[String]) -> (String, usize) {
    if args.len() >= 3 && args[1] == "--params" {
        return (args[2].clone(), 3);
    }
    (DEFAULT_PARAMS_PATH.to_string(), 1)
}

fn load_gene(path: &str) -> Result<GeneInfo> {
    GeneInfo::from_fasta_file(path)
        .with_context(|| format!("Could not read FASTA file '{path}'"))?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No sequence in '{path}'"))
}

fn parse_residue(value: &str) -> Result<usize> {
    value
        .parse()
        .with_context(|| format!("Invalid residue number '{value}'"))
}

fn parse_amino_acid(value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(aa), None) => Ok(aa.to_ascii_uppercase()),
        _ => bail!("Expected a one-letter amino acid, got '{value}'"),
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn render_card(index: usize, result: &RepairResult) -> String {
    let frame = result.arm_reading_frame();
    format!(
        "#{} {} {:?} site at {} ({:?}), score {}\n\
         spacer      {} PAM {}\n\
         oligo fwd   {}\n\
         oligo rev   {}\n\
         silent edits {}\n\
         arm {}..{}\n{}\n\
         protein {}..{}\n{}\n",
        index + 1,
        result.mutation,
        result.site.strand,
        result.site.position,
        result.strategy,
        result.score,
        result.spacer,
        result.pam,
        result.oligos.forward,
        result.oligos.reverse,
        result.silent_mutation_count,
        result.arm_start,
        result.arm_end,
        result.arm_alignment.render(frame),
        result.verification.window_start,
        result.verification.window_end,
        result.window_alignment.render(0),
    )
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    if let Err(e) = run() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        usage();
        bail!("Missing command");
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", about::version_cli_text());
        return Ok(());
    }

    let (params_path, cmd_idx) = parse_global_params_arg(&args);
    if args.len() <= cmd_idx {
        usage();
        bail!("Missing command");
    }
    let command = &args[cmd_idx];

    match command.as_str() {
        "score" => {
            let Some(guide) = args.get(cmd_idx + 1) else {
                usage();
                bail!("score requires GUIDE_WITH_PAM");
            };
            println!("{}", calculate_efficiency_score(guide));
            Ok(())
        }
        "sites" => {
            if args.len() <= cmd_idx + 2 {
                usage();
                bail!("sites requires: GENE.fa RESIDUE");
            }
            let gene = load_gene(&args[cmd_idx + 1])?;
            let residue = parse_residue(&args[cmd_idx + 2])?;
            let params = DesignParameters::load_or_default(&params_path)?;
            gene.validate()?;
            let target = gene.residue_start(residue)?;
            let sites: Vec<SiteSummary> =
                Cas9Site::find_sites(gene.bytes(), target, params.site_window)
                    .into_iter()
                    .map(|site| {
                        let guide_with_pam = site.guide_with_pam();
                        SiteSummary {
                            position: site.position,
                            strand: format!("{:?}", site.strand).to_lowercase(),
                            distance: site.distance_to(target),
                            score: calculate_efficiency_score(&guide_with_pam),
                            pam: guide_with_pam[SPACER_LENGTH..].to_string(),
                            guide_with_pam,
                        }
                    })
                    .collect();
            print_json(&sites)
        }
        "design" => {
            if args.len() <= cmd_idx + 3 {
                usage();
                bail!("design requires: GENE.fa RESIDUE AA");
            }
            let gene = load_gene(&args[cmd_idx + 1])?;
            let residue = parse_residue(&args[cmd_idx + 2])?;
            let amino_acid = parse_amino_acid(&args[cmd_idx + 3])?;
            let mut params = DesignParameters::load_or_default(&params_path)?;
            if let Some(n) = flag_value(&args, "--oligo-length") {
                let n = n
                    .parse()
                    .with_context(|| format!("Invalid oligo length '{n}'"))?;
                params = params.with_oligo_length(Some(n));
            }
            let request = DesignRequest::new(gene, residue, amino_acid).with_parameters(params);
            let results = generate_repair_templates(&request)
                .with_context(|| format!("{} {}", request.gene.id, request.mutation_label()))?;
            if args.iter().any(|a| a == "--text") {
                for (i, result) in results.iter().enumerate() {
                    println!("{}", render_card(i, result));
                }
                Ok(())
            } else {
                print_json(&results)
            }
        }
        _ => {
            usage();
            bail!("Unknown command '{command}'")
        }
    }
}
