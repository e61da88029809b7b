use crate::cut::CutPlan;
use crate::ffmpeg::{
    FFmpegTools, check_dependency, check_ffmpeg_installation, check_ffmpeg_version,
};
use crate::probe::{inspect_streams, probe_duration};
use crate::{
    cli::Args,
    profile::Profile,
    timeframe::{CutMethod, resolve_timeframe},
};
use anyhow::{Result, bail};
use comfy_table::{Table, presets::UTF8_FULL};
use log::{debug, info};
use std::{
    fs::{self},
    io,
    io::Write,
    path::Path,
};

pub fn run(args: Args) -> Result<()> {
    let tools = FFmpegTools {
        ffmpeg: args.ffmpeg.clone(),
        ffprobe: args.ffprobe.clone(),
    };

    // Handle --check-ffmpeg command
    if args.check_ffmpeg {
        return handle_ffmpeg_check(&tools);
    }

    let profile = merge_profile(&args, Profile::load(args.profile.as_deref())?);

    // Handle --inspect command
    if args.inspect {
        let input = profile
            .input
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("--input is required for inspection"))?;
        return handle_inspect(&tools, input);
    }

    let input = profile
        .input
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--input is required"))?;
    let output = profile
        .output
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--output is required"))?;
    if input == output {
        bail!("Input and output file cannot be the same.");
    }
    if profile.timeframe.is_empty() {
        bail!("At least one time range is required (--range or `timeframe` in the profile).");
    }

    if !args.show_command {
        check_ffmpeg_version(&tools, args.ignore_ffmpeg_version)?;
    }
    check_dependency(&tools.ffprobe)?;

    let duration = probe_duration(&tools, input)?;
    println!("ℹ️ Source duration: {:.3} s", duration);

    let ranges = resolve_timeframe(&profile.timeframe, profile.cut_method, duration, args.strict)?;
    let plan = CutPlan::new(input, output, ranges)?;
    info!("Video filter: {}", plan.video_filter);
    info!("Audio filter: {}", plan.audio_filter);

    print_plan(&plan, &profile, duration);

    if args.show_command {
        handle_inspect(&tools, input)?;
        let mut command = vec![tools.ffmpeg.clone()];
        command.extend(plan.ffmpeg_args());
        println!("\n▶️ FFmpeg command:");
        println!("{:#?}", command);
        return Ok(());
    }

    if args.yes {
        println!("\n--yes flag provided, proceeding without confirmation.");
    } else {
        println!("\nProceed with this plan? [y/N]");
        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("Aborting operation.");
            return Ok(());
        }
    }

    // Optionally write the profile to a file (after confirmation)
    if let Some(write_profile) = &args.write_profile {
        let out_path = profile_path_for(write_profile.as_deref(), input);
        let json = serde_json::to_string_pretty(&profile)?;
        let mut file = fs::File::create(&out_path)?;
        file.write_all(json.as_bytes())?;
        println!("✅ Wrote profile to {}", out_path);
    }

    println!("\n▶️ Cutting...");
    debug!("Cut plan: {:?}", plan);
    plan.apply(&tools, args.debug)?;

    println!("✅ Processing complete! Output: {}", output);
    Ok(())
}

/// Apply CLI overrides on top of an optional profile file.
fn merge_profile(args: &Args, profile: Option<Profile>) -> Profile {
    let profile = profile.unwrap_or_default();
    Profile {
        input: args.input.clone().or(profile.input),
        output: args.output.clone().or(profile.output),
        cut_method: args.cut_method.unwrap_or(profile.cut_method),
        timeframe: if !args.ranges.is_empty() {
            args.ranges.clone()
        } else {
            profile.timeframe
        },
    }
}

/// Explicit path, or the input path with its extension replaced by `.json`.
fn profile_path_for(explicit: Option<&str>, input: &str) -> String {
    match explicit {
        Some(path) => path.to_string(),
        None => Path::new(input)
            .with_extension("json")
            .to_string_lossy()
            .to_string(),
    }
}

fn print_plan(plan: &CutPlan, profile: &Profile, duration: f64) {
    let mut table = Table::new();
    table
        .set_header(vec!["#", "Keep From (s)", "Keep To (s)", "Length (s)"])
        .load_preset(UTF8_FULL);

    for (i, range) in plan.ranges.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            range.start.to_string(),
            range.end.to_string(),
            range.len().to_string(),
        ]);
    }

    println!("\n▶️ Proposed Cutting Plan:");
    println!("{table}");

    let method = match profile.cut_method {
        CutMethod::Select => "select (keep listed ranges)",
        CutMethod::Delete => "delete (remove listed ranges)",
    };

    let mut info_table = Table::new();
    info_table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Parameter", "Value"]);
    info_table
        .add_row(vec!["Input File", &plan.input])
        .add_row(vec!["Output File", &plan.output])
        .add_row(vec!["Source Duration", &format!("{:.3} s", duration)])
        .add_row(vec!["Cut Method", method])
        .add_row(vec!["Declared Ranges", &profile.timeframe.len().to_string()])
        .add_row(vec!["Kept Length", &format!("{} s", plan.kept_seconds())]);

    println!("\n▶️ Job Details:");
    println!("{info_table}");
}

fn handle_ffmpeg_check(tools: &FFmpegTools) -> Result<()> {
    println!("🔍 Checking {} and {}...\n", tools.ffmpeg, tools.ffprobe);

    let check = check_ffmpeg_installation(tools);

    if !check.ffmpeg_available {
        let reason = check
            .error
            .unwrap_or_else(|| format!("`{} -version` failed", tools.ffmpeg));
        println!("❌ {}", reason);
        bail!("FFmpeg is required: point --ffmpeg at a working executable");
    }

    match &check.ffmpeg_version {
        Some(v) if v.is_compatible => {
            println!("✅ FFmpeg {}.{}.{}", v.major, v.minor, v.patch)
        }
        Some(v) => println!(
            "❌ FFmpeg {}.{}.{} is older than 4.0 (use --ignore-ffmpeg-version to try anyway)",
            v.major, v.minor, v.patch
        ),
        None => println!("⚠️  FFmpeg found, version unknown"),
    }

    if !check.ffprobe_available {
        println!("❌ {} is missing or broken", tools.ffprobe);
        bail!("FFprobe is required to read the source duration");
    }
    println!("✅ FFprobe");

    for filter in ["select", "aselect"] {
        if check.missing_filters.contains(&filter) {
            println!("❌ Filter '{}' is not available, cuts will fail", filter);
        } else {
            println!("✅ Filter '{}'", filter);
        }
    }

    println!("\n🎉 FFmpeg check complete!");
    Ok(())
}

fn handle_inspect(tools: &FFmpegTools, input: &str) -> Result<()> {
    println!("🔍 Inspecting streams in: {}\n", input);

    let streams = inspect_streams(tools, input)?;

    if streams.is_empty() {
        println!("❌ No streams found in the input file.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Index", "Type", "Codec", "Duration", "Details"]);

    for stream in streams {
        table.add_row(vec![
            stream.index.to_string(),
            stream.kind,
            stream.codec,
            stream.duration,
            stream.details,
        ]);
    }

    println!("{}", table);
    Ok(())
}
