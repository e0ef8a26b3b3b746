//! Project templates for `kernel-tools init`
//!
//! The skeleton is the ReLU example: one CUDA kernel, its Torch binding, a
//! Python wrapper and a test. Contents are fixed and do not depend on the
//! target directory name.

/// Example operator the skeleton implements
pub const EXAMPLE_NAME: &str = "relu";

/// One file of the skeleton, relative to the project root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: &'static str,
    pub contents: &'static str,
}

/// Template for build.toml
pub const BUILD_TOML: &str = r#"[general]
name = "relu"

[torch]
src = [
  "torch-ext/torch_binding.cpp",
  "torch-ext/torch_binding.h"
]

[kernel.activation]
cuda-capabilities = [ "7.0", "7.2", "7.5", "8.0", "8.6", "8.7", "8.9", "9.0" ]
src = [
  "relu_kernel/relu.cu",
]
depends = [ "torch" ]
"#;

/// Template for flake.nix
pub const FLAKE_NIX: &str = r#"{
  description = "Flake for ReLU kernel";

  inputs = {
    kernel-builder.url = "github:huggingface/kernel-builder";
  };

  outputs =
    {
      self,
      kernel-builder,
    }:
    kernel-builder.lib.genFlakeOutputs ./.;
}
"#;

/// Template for relu_kernel/relu.cu
pub const RELU_CU: &str = r#"#include <ATen/cuda/CUDAContext.h>
#include <c10/cuda/CUDAGuard.h>
#include <torch/all.h>

#include <cmath>

/**
 * Elementwise ReLU over the last dimension of a row-major tensor.
 * One block per token, threads stride over the hidden dimension.
 */
__global__ void relu_kernel(float *__restrict__ out,
                            float const *__restrict__ input,
                            const int d) {
  const int64_t token_idx = blockIdx.x;
  for (int64_t idx = threadIdx.x; idx < d; idx += blockDim.x) {
    auto x = input[token_idx * d + idx];
    out[token_idx * d + idx] = x > 0.0f ? x : 0.0f;
  }
}

/**
 * Host entry point registered as the `relu` operator.
 */
void relu(torch::Tensor &out,
          torch::Tensor const &input)
{
  TORCH_CHECK(input.scalar_type() == at::ScalarType::Float &&
                  out.scalar_type() == at::ScalarType::Float,
              "relu_kernel only supports float32");

  int d = input.size(-1);
  int64_t num_tokens = input.numel() / d;
  dim3 grid(num_tokens);
  dim3 block(std::min(d, 1024));
  const at::cuda::OptionalCUDAGuard device_guard(device_of(input));
  const cudaStream_t stream = at::cuda::getCurrentCUDAStream();
  relu_kernel<<<grid, block, 0, stream>>>(out.data_ptr<float>(),
                                          input.data_ptr<float>(), d);
}
"#;

/// Template for tests/__init__.py
pub const TESTS_INIT_PY: &str = "# Tests for the relu kernel.\n";

/// Template for tests/test_relu.py
pub const TEST_RELU_PY: &str = r#"import torch
import torch.nn.functional as F

import relu


def test_relu():
    x = torch.randn(1024, 1024, dtype=torch.float32, device="cuda")
    torch.testing.assert_close(F.relu(x), relu.relu(x))
"#;

/// Template for torch-ext/relu/__init__.py
pub const WRAPPER_INIT_PY: &str = r#"from typing import Optional

import torch

from ._ops import ops


def relu(x: torch.Tensor, out: Optional[torch.Tensor] = None) -> torch.Tensor:
    if out is None:
        out = torch.empty_like(x)
    ops.relu(out, x)
    return out


__all__ = ["ops", "relu"]
"#;

/// Template for torch-ext/torch_binding.cpp
pub const TORCH_BINDING_CPP: &str = r#"#include <torch/library.h>

#include "registration.h"
#include "torch_binding.h"

TORCH_LIBRARY_EXPAND(TORCH_EXTENSION_NAME, ops) {
  ops.def("relu(Tensor! out, Tensor input) -> ()");
  ops.impl("relu", torch::kCUDA, &relu);
}

REGISTER_EXTENSION(TORCH_EXTENSION_NAME)
"#;

/// Template for torch-ext/torch_binding.h
pub const TORCH_BINDING_H: &str = r#"#pragma once

#include <torch/torch.h>

void relu(torch::Tensor &out, torch::Tensor const &input);
"#;

/// Every file the skeleton consists of
pub const FILES: &[TemplateFile] = &[
    TemplateFile {
        path: "build.toml",
        contents: BUILD_TOML,
    },
    TemplateFile {
        path: "flake.nix",
        contents: FLAKE_NIX,
    },
    TemplateFile {
        path: "relu_kernel/relu.cu",
        contents: RELU_CU,
    },
    TemplateFile {
        path: "tests/__init__.py",
        contents: TESTS_INIT_PY,
    },
    TemplateFile {
        path: "tests/test_relu.py",
        contents: TEST_RELU_PY,
    },
    TemplateFile {
        path: "torch-ext/relu/__init__.py",
        contents: WRAPPER_INIT_PY,
    },
    TemplateFile {
        path: "torch-ext/torch_binding.cpp",
        contents: TORCH_BINDING_CPP,
    },
    TemplateFile {
        path: "torch-ext/torch_binding.h",
        contents: TORCH_BINDING_H,
    },
];
