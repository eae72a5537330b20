// skylark_sim/src/simulation/plugins/world/scene.rs

//! World scene loading: the visual map, its static collider mesh,
//! lighting and the debug camera.

use avian3d::prelude::*;
use bevy::{
    asset::LoadState,
    gltf::{Gltf, GltfAssetLabel, GltfMesh},
    scene::SceneInstance,
    transform::TransformSystem,
};
use bevy::prelude::*;
use bevy_fly_camera::{FlyCamera, FlyCameraPlugin};

use crate::cli::Cli;
use crate::simulation::core::app_state::{AppState, SceneBuildSet};
use crate::simulation::config::structs::ScenarioConfig;
use crate::simulation::plugins::world::markers::harvest_markers;

// --- Resources to track loading state ---

// Resource to hold the handle for the VISUAL scene GLB
#[derive(Resource)]
struct VisualWorldHandle(Handle<Scene>);

// Resource to hold the handle for the COLLIDER mesh GLB
#[derive(Resource)]
struct ColliderWorldHandle(Handle<Gltf>);

/// Marker for the root entity of the instanced world scene.
#[derive(Component)]
pub struct WorldSceneRoot;

pub struct WorldScenePlugin;

impl Plugin for WorldScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(FlyCameraPlugin)
            // --- STAGE 1: ASSET LOADING ---
            // Kick off the loading for BOTH world files.
            .add_systems(OnEnter(AppState::AssetLoading), start_world_asset_loading)
            // Wait for both assets before transitioning to the next state.
            .add_systems(
                Update,
                check_world_load_completion.run_if(in_state(AppState::AssetLoading)),
            )
            // --- STAGE 2: SCENE BUILDING ---
            .add_systems(
                OnEnter(AppState::SceneBuilding),
                (
                    (spawn_lighting_and_camera, spawn_visual_world_scene)
                        .in_set(SceneBuildSet::SpawnScene),
                    spawn_colliders_from_gltf.in_set(SceneBuildSet::Physics),
                ),
            )
            // Markers are harvested as the scene instances. This runs in
            // PostUpdate so harvested world poses are post-propagation.
            .add_systems(
                PostUpdate,
                harvest_markers.after(TransformSystem::TransformPropagate),
            )
            .add_systems(
                Update,
                finish_scene_building.run_if(in_state(AppState::SceneBuilding)),
            );
    }
}

/// Kicks off the world scene and collider mesh loads and applies the
/// configured gravity.
fn start_world_asset_loading(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<ScenarioConfig>,
) {
    commands.insert_resource(Gravity(Vec3::from(config.world.gravity)));

    // --- Load Visual Scene ---
    let visual_scene_path = config.world.map_file.clone();
    info!(
        "[ASSETS] Starting to load visual world scene: {}",
        visual_scene_path.display()
    );
    let scene_handle =
        asset_server.load(GltfAssetLabel::Scene(0).from_asset(visual_scene_path));
    commands.insert_resource(VisualWorldHandle(scene_handle));

    // --- Load Collider Mesh ---
    let mut collider_mesh_path = config.world.map_file.clone();
    let stem = collider_mesh_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("world")
        .to_string();
    collider_mesh_path.set_file_name(format!("{stem}_collider.glb"));
    info!(
        "[ASSETS] Starting to load collider world mesh: {}",
        collider_mesh_path.display()
    );
    let gltf_handle: Handle<Gltf> = asset_server.load(collider_mesh_path);
    commands.insert_resource(ColliderWorldHandle(gltf_handle));
}

/// Checks whether both world assets have finished loading (or failed)
/// before changing the state. A missing map is logged and tolerated: the
/// run continues with an empty world rather than hanging in this state.
fn check_world_load_completion(
    mut next_state: ResMut<NextState<AppState>>,
    asset_server: Res<AssetServer>,
    visual_handle: Res<VisualWorldHandle>,
    collider_handle: Res<ColliderWorldHandle>,
) {
    let settled = |state: Option<LoadState>| match state {
        Some(LoadState::Loaded) => true,
        Some(LoadState::Failed(_)) => {
            error!("[ASSETS] A world asset failed to load; continuing without it.");
            true
        }
        _ => false,
    };

    let visual_settled = settled(asset_server.get_load_state(&visual_handle.0));
    let collider_settled = settled(asset_server.get_load_state(&collider_handle.0));

    if visual_settled && collider_settled {
        info!("[ASSETS] World assets settled. Transitioning to SceneBuilding.");
        next_state.set(AppState::SceneBuilding);
    }
}

/// Spawns lights and the debug camera. Skipped in headless runs.
fn spawn_lighting_and_camera(mut commands: Commands, cli: Option<Res<Cli>>) {
    if cli.as_deref().map(|c| c.headless).unwrap_or(false) {
        return;
    }

    // --- Spawn Lighting ---
    commands.spawn(DirectionalLight {
        shadows_enabled: true,
        illuminance: 15_000.0,
        ..default()
    });

    // --- Spawn Camera ---
    let camera_transform = Transform::from_xyz(-30.0, 25.0, 30.0).looking_at(Vec3::ZERO, Vec3::Y);
    commands.spawn((Camera3d::default(), camera_transform, FlyCamera::default()));
}

/// Spawns the visual-only scene into the world.
fn spawn_visual_world_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    visual_handle: Res<VisualWorldHandle>,
) {
    let loaded = matches!(
        asset_server.get_load_state(&visual_handle.0),
        Some(LoadState::Loaded)
    );
    if !loaded {
        warn!("[SCENE] Visual world scene unavailable; building an empty world.");
        return;
    }

    info!("[SCENE] Spawning main visual world scene.");
    commands.spawn((
        SceneRoot(visual_handle.0.clone()),
        WorldSceneRoot,
        Name::new("WorldScene"),
    ));
}

/// Builds static trimesh colliders from every named mesh in the collider
/// GLB.
fn spawn_colliders_from_gltf(
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
    gltf_meshes: Res<Assets<GltfMesh>>,
    meshes: Res<Assets<Mesh>>,
    mut commands: Commands,
    gltf_handle_res: Option<Res<ColliderWorldHandle>>,
) {
    let Some(gltf_handle_res) = gltf_handle_res else {
        return;
    };
    let gltf_handle = &gltf_handle_res.0;

    let loaded = matches!(
        asset_server.get_load_state(gltf_handle),
        Some(LoadState::Loaded)
    );
    if !loaded {
        warn!("[SCENE] Collider mesh unavailable; world has no static collision.");
        commands.remove_resource::<ColliderWorldHandle>();
        return;
    }

    let Some(gltf) = gltfs.get(gltf_handle) else {
        warn!("GLTF load state says loaded, but Gltf asset not found.");
        return;
    };

    for (name, gltf_mesh_handle) in &gltf.named_meshes {
        let Some(gltf_mesh) = gltf_meshes.get(gltf_mesh_handle) else {
            warn!("GltfMesh for '{}' not loaded yet.", name);
            continue;
        };
        if gltf_mesh.primitives.is_empty() {
            warn!("Mesh '{}' has no primitives.", name);
            continue;
        }

        // Each primitive holds a handle to the final processed Mesh.
        let mesh_handle = gltf_mesh.primitives[0].mesh.clone();
        let Some(mesh) = meshes.get(&mesh_handle) else {
            warn!("Mesh asset not loaded for '{}'.", name);
            continue;
        };
        let Some(collider) = Collider::trimesh_from_mesh(mesh) else {
            warn!("Could not create collider from mesh '{}'.", name);
            continue;
        };

        info!("[SCENE] Creating collider for '{}'", name);
        commands.spawn((
            collider,
            RigidBody::Static,
            Name::new(format!("Collider: {}", name)),
        ));
    }

    // Done; remove the marker resource so this never runs again.
    commands.remove_resource::<ColliderWorldHandle>();
}

/// Moves the app into `Running` once the world scene has fully instanced
/// (or was never spawned because the map failed to load). Spawn sequences
/// keep resolving asynchronously in `Running`; they never gate this
/// transition.
fn finish_scene_building(
    mut next_state: ResMut<NextState<AppState>>,
    scene_spawner: Res<SceneSpawner>,
    roots: Query<(Entity, Option<&SceneInstance>), With<WorldSceneRoot>>,
) {
    let ready = match roots.single() {
        Ok((_, Some(instance))) => scene_spawner.instance_is_ready(**instance),
        // The scene spawner has not attached the instance id yet.
        Ok((_, None)) => false,
        // No world scene was spawned at all (the map failed to load);
        // there is nothing to wait for.
        Err(bevy::ecs::query::QuerySingleError::NoEntities(_)) => true,
        Err(_) => false,
    };

    if ready {
        info!("Scene building complete. Transitioning to Running state.");
        next_state.set(AppState::Running);
    }
}
