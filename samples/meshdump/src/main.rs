use std::{cell::RefCell, rc::Rc};

use clap::Parser;
use tessel::{
    render::{CommandLog, DrawCommand},
    Group, SpatialNode, TriMesh,
};

mod cli;

#[rustfmt::skip]
const CUBE_VERTICES: [f32; 24] = [
    -0.5, -0.5, -0.5,
     0.5, -0.5, -0.5,
     0.5,  0.5, -0.5,
    -0.5,  0.5, -0.5,
    -0.5, -0.5,  0.5,
     0.5, -0.5,  0.5,
     0.5,  0.5,  0.5,
    -0.5,  0.5,  0.5,
];

#[rustfmt::skip]
const CUBE_INDICES: [u16; 36] = [
    0, 2, 1, 0, 3, 2, // -z
    4, 5, 6, 4, 6, 7, // +z
    0, 1, 5, 0, 5, 4, // -y
    3, 6, 2, 3, 7, 6, // +y
    0, 4, 7, 0, 7, 3, // -x
    1, 2, 6, 1, 6, 5, // +x
];

/// Per-vertex normals of a cube whose corners are shared between faces.
fn corner_normals() -> Vec<f32> {
    let scale = 1.0 / 3f32.sqrt();
    CUBE_VERTICES.iter().map(|c| c.signum() * scale).collect()
}

fn build_cube(cli: &cli::Cli) -> Result<TriMesh, tessel::Error> {
    let mut cube = TriMesh::new("cube");
    cube.set_vertices(&CUBE_VERTICES)?;
    cube.set_indices(&CUBE_INDICES)?;
    cube.set_normals(&corner_normals())?;
    if let Some(rgba) = cli.color {
        cube.set_solid_color(rgba)?;
    }
    cube.set_draw_mode(cli.mode.into());
    Ok(cube)
}

fn print_command(cmd: &DrawCommand, verbose: bool) {
    if !verbose {
        println!("    {cmd}");
        return;
    }
    match cmd {
        DrawCommand::MultMatrix(m) => println!("    mult_matrix{m}"),
        DrawCommand::VertexPointer { data, .. } | DrawCommand::NormalPointer { data } => {
            println!("    {cmd}: {data:?}")
        }
        DrawCommand::ColorPointer { data, .. } => println!("    {cmd}: {data:?}"),
        DrawCommand::DrawElements { indices, .. } => println!("    {cmd}: {indices:?}"),
        _ => println!("    {cmd}"),
    }
}

fn run(cli: &cli::Cli) -> Result<(), tessel::Error> {
    let cube = build_cube(cli)?;
    let scene = Group::new("scene");

    for i in 1..=cli.clones {
        let mut clone = cube.clone_mesh(format!("cube.{i}"))?;
        clone
            .spatial_mut()
            .set_local_translation(cli.spacing * i as f32);
        Group::attach(&scene, Rc::new(RefCell::new(clone)));
    }
    Group::attach(&scene, Rc::new(RefCell::new(cube)));

    scene.borrow_mut().update_transform(None);
    scene.borrow_mut().update_world_bound(false);
    tracing::info!(
        clones = cli.clones,
        bound = ?scene.borrow().spatial().world_bound(),
        "scene built"
    );

    let mut log = CommandLog::default();
    scene.borrow().draw(&mut log)?;

    for node in scene.borrow().children() {
        let node = node.borrow();
        println!(
            "{} (world bound: {:?})",
            node.name(),
            node.spatial().world_bound().map(|b| (b.mins, b.maxs))
        );
    }
    println!("{} commands:", log.commands().len());
    for cmd in log.commands() {
        print_command(cmd, cli.verbose);
    }
    if log.depth() != 0 || !log.enabled().is_empty() {
        tracing::warn!(depth = log.depth(), enabled = ?log.enabled(), "unbalanced draw state");
    }
    Ok(())
}

pub fn main() -> std::process::ExitCode {
    let cli = cli::Cli::parse();
    cli::initialize_tracing(&cli);
    tracing::debug!(?cli, "parsed arguments");

    match run(&cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}
