//! Canned p5.js sketches addressable by key.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKey {
    BasicDrawing,
    AnimatedBackground,
    InteractiveParticles,
    RotatingCube,
    GenerativeArt,
}

impl SampleKey {
    pub const ALL: [SampleKey; 5] = [
        SampleKey::BasicDrawing,
        SampleKey::AnimatedBackground,
        SampleKey::InteractiveParticles,
        SampleKey::RotatingCube,
        SampleKey::GenerativeArt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SampleKey::BasicDrawing => "basic_drawing",
            SampleKey::AnimatedBackground => "animated_background",
            SampleKey::InteractiveParticles => "interactive_particles",
            SampleKey::RotatingCube => "rotating_cube",
            SampleKey::GenerativeArt => "generative_art",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    /// Comma-separated list of every key, for error messages.
    pub fn available() -> String {
        Self::ALL.map(SampleKey::as_str).join(", ")
    }

    pub fn code(self) -> &'static str {
        match self {
            SampleKey::BasicDrawing => BASIC_DRAWING,
            SampleKey::AnimatedBackground => ANIMATED_BACKGROUND,
            SampleKey::InteractiveParticles => INTERACTIVE_PARTICLES,
            SampleKey::RotatingCube => ROTATING_CUBE,
            SampleKey::GenerativeArt => GENERATIVE_ART,
        }
    }
}

/// Sent by `test_connection`.
pub const CONNECTION_TEST: &str = r#"function setup() {
  createCanvas(400, 400);
  background(100, 200, 100);
}

function draw() {
  fill(255);
  textAlign(CENTER, CENTER);
  textSize(24);
  text("Bridge connection test", width / 2, height / 2);
}"#;

const BASIC_DRAWING: &str = r#"function setup() {
  createCanvas(800, 600);
  background(220);
}

function draw() {
  fill(255, 0, 0);
  ellipse(mouseX, mouseY, 50, 50);
}"#;

const ANIMATED_BACKGROUND: &str = r#"function setup() {
  createCanvas(400, 400);
  colorMode(HSB);
}

function draw() {
  background(frameCount % 360, 80, 90);
  
  for (let i = 0; i < 10; i++) {
    fill(i * 36, 100, 100);
    rect(i * 40, height/2, 30, 100);
  }
}"#;

const INTERACTIVE_PARTICLES: &str = r#"let particles = [];

function setup() {
  createCanvas(800, 600);
  for (let i = 0; i < 100; i++) {
    particles.push({
      x: random(width),
      y: random(height),
      vx: random(-2, 2),
      vy: random(-2, 2)
    });
  }
}

function draw() {
  background(0, 20);
  
  for (let p of particles) {
    p.x += p.vx;
    p.y += p.vy;
    
    if (p.x < 0 || p.x > width) p.vx *= -1;
    if (p.y < 0 || p.y > height) p.vy *= -1;
    
    fill(255);
    circle(p.x, p.y, 5);
  }
}"#;

const ROTATING_CUBE: &str = r#"function setup() {
  createCanvas(600, 600, WEBGL);
}

function draw() {
  background(50);
  
  rotateX(frameCount * 0.01);
  rotateY(frameCount * 0.01);
  
  fill(255, 100, 100);
  box(200);
}"#;

const GENERATIVE_ART: &str = r#"function setup() {
  createCanvas(800, 800);
  background(0);
  noLoop();
}

function draw() {
  for (let i = 0; i < 1000; i++) {
    let x = random(width);
    let y = random(height);
    let size = random(2, 20);
    
    fill(random(255), random(255), random(255), 150);
    noStroke();
    ellipse(x, y, size, size);
  }
}"#;
